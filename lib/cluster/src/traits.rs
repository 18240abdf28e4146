//! Clustering traits.

use crate::cluster::Cluster;
use crate::naming::NameGenerator;
use crate::settings::ClusterSettings;
use simlens_core::{DataObject, FeatureVectors, Result};

/// Trait for clustering algorithms.
///
/// Implementations keep no state between calls; everything an algorithm
/// tracks while running lives inside a single `cluster` invocation.
pub trait Clusterer {
    type Settings: ClusterSettings;

    /// Partition `objects` into named clusters, largest first.
    fn cluster<'a>(
        &self,
        objects: &'a [DataObject],
        settings: &Self::Settings,
        names: &mut NameGenerator,
    ) -> Result<Vec<Cluster<'a>>>;
}

/// Extract comparable features for every object, in input order
pub(crate) fn extract_features(objects: &[DataObject]) -> Result<Vec<FeatureVectors>> {
    objects.iter().map(FeatureVectors::from_object).collect()
}
