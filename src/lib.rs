//! # simlens
//!
//! A dataset analysis engine for tables of objects described by numeric and
//! categorical parameters.
//!
//! simlens answers four questions about a dataset snapshot:
//!
//! - **Which objects group together?** K-Means, DBSCAN and average-linkage
//!   agglomerative clustering over a weighted mixed-type distance
//! - **How alike is every pair?** Per-parameter similarity averaged into a
//!   percentage
//! - **Where does each object sit on a plot?** PCA projection to 2D
//! - **How far apart are two objects?** Euclidean, Manhattan or Cosine on
//!   numeric features combined with Hamming or Jaccard on one-hot features
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! simlens --dataset shop.json kmeans --clusters 4
//! simlens --dataset shop.json dbscan --epsilon 0.2 --min-points 3 --pretty
//! simlens --dataset shop.json similarity --top 10
//! ```
//!
//! ### As a library
//!
//! ```rust
//! use simlens::prelude::*;
//!
//! let size = ParameterState::numeric(1, "size");
//! let objects = (0..6)
//!     .map(|i| {
//!         DataObject::new(i, format!("item {}", i), vec![
//!             ParameterValue::raw(i, size.clone(), if i < 3 { "1" } else { "50" }),
//!         ])
//!     })
//!     .collect();
//! let dataset = Dataset::new(1, "shop", vec![size], objects);
//!
//! let request = AnalysisRequest::KMeans(KMeansSettings::new(2, 100));
//! let AnalysisOutput::Clusters { clusters } = simlens::run(&dataset, &request).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(clusters.len(), 2);
//! assert!(clusters.iter().all(|c| c.size == 3));
//! ```
//!
//! ## Crate Structure
//!
//! - [`simlens-core`](https://docs.rs/simlens-core) - Data model, metrics, distance calculator, normalizer
//! - [`simlens-similarity`](https://docs.rs/simlens-similarity) - Pairwise similarity
//! - [`simlens-cluster`](https://docs.rs/simlens-cluster) - K-Means, DBSCAN, agglomerative
//! - [`simlens-reduce`](https://docs.rs/simlens-reduce) - PCA with a Jacobi eigen-solver

pub mod analysis;

pub use analysis::{
    load_dataset, load_request, run, AnalysisError, AnalysisOutput, AnalysisRequest,
    ClusterReport, MemberReport,
};

// Re-export core types
pub use simlens_core::{
    CategoricalMetric, DataObject, Dataset, DistanceCalculator, DistanceMetric, Error,
    FeatureVectors, Normalizer, NumericMetric, ObjectId, ParameterState, ParameterType,
    ParameterValue, Result, ValueData,
};

// Re-export components
pub use simlens_cluster::{
    Agglomerative, AgglomerativeSettings, Cluster, ClusterKind, Clusterer, Dbscan,
    DbscanSettings, KMeans, KMeansSettings, MetricSettings, NameGenerator,
};
pub use simlens_reduce::{JacobiSolver, ObjectCoordinate, PcaReducer, ReductionResult};
pub use simlens_similarity::{SimilarityComparer, SimilarityPair};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisOutput, AnalysisRequest,
        DataObject, Dataset, ParameterState, ParameterValue,
        NumericMetric, CategoricalMetric, DistanceCalculator,
        KMeans, Dbscan, Agglomerative, Clusterer, NameGenerator,
        KMeansSettings, DbscanSettings, AgglomerativeSettings,
        SimilarityComparer, PcaReducer,
        Error, Result,
    };
}
