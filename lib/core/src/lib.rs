//! # simlens Core
//!
//! Core library for the simlens dataset analysis engine.
//!
//! This crate provides the data model and the distance machinery shared by
//! the clustering, similarity and projection crates:
//!
//! - [`Dataset`], [`DataObject`], [`ParameterValue`] - the typed dataset snapshot
//! - [`DistanceMetric`] - Euclidean, Manhattan, Cosine, Hamming and Jaccard metrics
//! - [`DistanceCalculator`] - weighted mixed-type distance between two objects
//! - [`Normalizer`] - min-max / one-hot preparation of raw datasets
//!
//! ## Example
//!
//! ```rust
//! use simlens_core::{
//!     CategoricalMetric, DataObject, DistanceCalculator, NumericMetric, ParameterState,
//!     ParameterValue,
//! };
//!
//! let size = ParameterState::numeric(1, "size");
//! let a = DataObject::new(1, "a", vec![ParameterValue::numeric(1, size.clone(), 0.2)]);
//! let b = DataObject::new(2, "b", vec![ParameterValue::numeric(2, size, 0.6)]);
//!
//! let calculator = DistanceCalculator::new();
//! let d = calculator
//!     .calculate(&a, &b, NumericMetric::Manhattan, CategoricalMetric::Hamming)
//!     .unwrap();
//! assert!((d - 0.4).abs() < 1e-12);
//! ```

pub mod error;
pub mod model;
pub mod metric;
pub mod calculator;
pub mod normalize;

pub use error::{Error, Result, VectorKind};
pub use model::{
    DataObject, Dataset, ObjectId, ObjectSummary, ParameterId, ParameterState, ParameterType,
    ParameterValue, ValueData,
};
pub use metric::{
    CategoricalMetric, Cosine, DistanceMetric, Euclidean, Hamming, Jaccard, Manhattan,
    MetricFactory, NumericMetric, StandardMetrics,
};
pub use calculator::{DistanceCalculator, FeatureVectors};
pub use normalize::{split_categories, Normalizer};
