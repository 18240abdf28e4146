//! # simlens Cluster
//!
//! Clustering of mixed numeric/categorical objects.
//!
//! All algorithms measure objects with the [`DistanceCalculator`] from
//! `simlens-core`, name their clusters through a caller-supplied
//! [`NameGenerator`], and return clusters sorted by member count, largest
//! first.
//!
//! | Algorithm | Settings | Failure modes |
//! |-----------|----------|---------------|
//! | [`KMeans`] | clusters, max iterations | fewer objects than clusters |
//! | [`Dbscan`] | epsilon, min points | none beyond distance errors |
//! | [`Agglomerative`] | merge threshold | none beyond distance errors |
//!
//! ## Example
//!
//! ```rust
//! use simlens_cluster::{Clusterer, Dbscan, DbscanSettings, NameGenerator};
//! use simlens_core::{DataObject, ParameterState, ParameterValue};
//!
//! let x = ParameterState::numeric(1, "x");
//! let objects: Vec<DataObject> = [0.0, 0.05, 0.9]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &v)| {
//!         DataObject::new(i as u64, format!("o{}", i), vec![ParameterValue::numeric(i as u64, x.clone(), v)])
//!     })
//!     .collect();
//!
//! let clusters = Dbscan::new()
//!     .cluster(&objects, &DbscanSettings::new(0.2, 2), &mut NameGenerator::new())
//!     .unwrap();
//! assert_eq!(clusters[0].name, "DBSCAN-1");
//! assert_eq!(clusters[0].len(), 2);
//! assert!(clusters[1].is_noise());
//! ```
//!
//! [`DistanceCalculator`]: simlens_core::DistanceCalculator

pub mod settings;
pub mod naming;
pub mod cluster;
pub mod traits;
pub mod kmeans;
pub mod dbscan;
pub mod agglomerative;

#[cfg(test)]
mod testing;

pub use settings::{
    AgglomerativeSettings, ClusterSettings, DbscanSettings, KMeansSettings, MetricSettings,
};
pub use naming::{NameGenerator, AGGLOMERATIVE_PREFIX, DBSCAN_PREFIX, KMEANS_PREFIX, NOISE_PREFIX};
pub use cluster::{sort_by_size, Cluster, ClusterKind};
pub use traits::Clusterer;
pub use kmeans::KMeans;
pub use dbscan::Dbscan;
pub use agglomerative::Agglomerative;
