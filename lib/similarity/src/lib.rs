//! # simlens Similarity
//!
//! Pairwise object similarity for tabular datasets.
//!
//! Every unordered pair of objects gets a similarity percentage in [0, 1],
//! computed as the unweighted average over the active parameters of a
//! per-value similarity:
//!
//! - **Numeric values**: closeness over the range observed in the dataset
//! - **Categorical values**: set overlap, so `"Red, Blue"` vs `"Blue"` scores 0.5
//! - **One-hot values**: overlap of the set bits
//!
//! ## Example
//!
//! ```rust
//! use simlens_core::{DataObject, Dataset, ParameterState, ParameterValue};
//! use simlens_similarity::SimilarityComparer;
//!
//! let color = ParameterState::categorical(1, "color");
//! let dataset = Dataset::new(
//!     1,
//!     "paint",
//!     vec![color.clone()],
//!     vec![
//!         DataObject::new(1, "a", vec![ParameterValue::raw(1, color.clone(), "Red, Blue")]),
//!         DataObject::new(2, "b", vec![ParameterValue::raw(2, color, "blue")]),
//!     ],
//! );
//!
//! let pairs = SimilarityComparer::new().compare_all_objects(&dataset);
//! assert_eq!(pairs.len(), 1);
//! assert!((pairs[0].similarity_percentage - 0.5).abs() < 1e-12);
//! ```

pub mod value;
pub mod compare;

pub use value::{one_hot_overlap, set_overlap, NumericDomain, ValueComparer};
pub use compare::{SimilarityComparer, SimilarityPair};
