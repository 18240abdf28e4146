//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two objects to be neighbors.
//! - **MinPoints**: Neighborhood size, the object itself included, for an
//!   object to be "core".
//! - **Border object**: Within ε of a core object but not core itself.
//! - **Noise**: Neither core nor border. All noise objects are returned
//!   together in one extra cluster.
//!
//! Visited and noise bookkeeping is keyed by object id and lives only for
//! the duration of one call.
//!
//! ## Complexity
//!
//! O(n²) distance evaluations; there is no spatial index.

use crate::cluster::{sort_by_size, Cluster, ClusterKind};
use crate::naming::{NameGenerator, DBSCAN_PREFIX, NOISE_PREFIX};
use crate::settings::{ClusterSettings, DbscanSettings};
use crate::traits::{extract_features, Clusterer};
use ahash::AHashSet;
use simlens_core::{
    DataObject, DistanceCalculator, FeatureVectors, MetricFactory, ObjectId, Result,
    StandardMetrics,
};
use std::collections::VecDeque;
use tracing::debug;

/// DBSCAN clusterer.
#[derive(Debug, Clone, Default)]
pub struct Dbscan<F = StandardMetrics> {
    calculator: DistanceCalculator<F>,
}

impl Dbscan<StandardMetrics> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-call state
struct Scan<'s, F> {
    calculator: &'s DistanceCalculator<F>,
    settings: &'s DbscanSettings,
    objects: &'s [DataObject],
    features: Vec<FeatureVectors>,
    visited: AHashSet<ObjectId>,
    noise: AHashSet<ObjectId>,
}

impl<'s, F: MetricFactory> Scan<'s, F> {
    /// Indices of all other objects within epsilon of `idx`
    fn region_query(&self, idx: usize) -> Result<Vec<usize>> {
        let metrics = self.settings.metrics();
        let mut neighbors = Vec::new();
        for (other, features) in self.features.iter().enumerate() {
            if other == idx {
                continue;
            }
            let d = self.calculator.calculate_features(
                &self.features[idx],
                features,
                metrics.numeric_metric,
                metrics.categorical_metric,
            )?;
            if d <= self.settings.epsilon {
                neighbors.push(other);
            }
        }
        Ok(neighbors)
    }

    #[inline]
    fn is_core(&self, neighbors: &[usize]) -> bool {
        neighbors.len() + 1 >= self.settings.min_points
    }

    /// Grow a cluster from the core object `seed`; returns member indices
    fn expand(&mut self, seed: usize, neighbors: Vec<usize>) -> Result<Vec<usize>> {
        let mut members = vec![seed];
        self.noise.remove(&self.objects[seed].id);

        let mut queued: AHashSet<ObjectId> = AHashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        for n in neighbors {
            if queued.insert(self.objects[n].id) {
                queue.push_back(n);
            }
        }

        while let Some(idx) = queue.pop_front() {
            let id = self.objects[idx].id;

            if !self.visited.insert(id) {
                // seen earlier as noise: it is a border object of this cluster
                if self.noise.remove(&id) {
                    members.push(idx);
                }
                continue;
            }
            members.push(idx);
            self.noise.remove(&id);

            let reachable = self.region_query(idx)?;
            if self.is_core(&reachable) {
                for n in reachable {
                    let nid = self.objects[n].id;
                    let claimable = !self.visited.contains(&nid) || self.noise.contains(&nid);
                    if claimable && queued.insert(nid) {
                        queue.push_back(n);
                    }
                }
            }
        }

        members.sort_unstable();
        Ok(members)
    }
}

impl<F: MetricFactory> Dbscan<F> {
    pub fn with_calculator(calculator: DistanceCalculator<F>) -> Self {
        Self { calculator }
    }
}

impl<F: MetricFactory> Clusterer for Dbscan<F> {
    type Settings = DbscanSettings;

    fn cluster<'a>(
        &self,
        objects: &'a [DataObject],
        settings: &DbscanSettings,
        names: &mut NameGenerator,
    ) -> Result<Vec<Cluster<'a>>> {
        settings.validate()?;

        let mut scan = Scan {
            calculator: &self.calculator,
            settings,
            objects,
            features: extract_features(objects)?,
            visited: AHashSet::with_capacity(objects.len()),
            noise: AHashSet::new(),
        };

        let mut clusters: Vec<Cluster<'a>> = Vec::new();
        for (idx, object) in objects.iter().enumerate() {
            if !scan.visited.insert(object.id) {
                continue;
            }

            let neighbors = scan.region_query(idx)?;
            if !scan.is_core(&neighbors) {
                scan.noise.insert(object.id);
                continue;
            }

            let mut cluster = Cluster::new(names.next_name(DBSCAN_PREFIX), ClusterKind::Basic);
            cluster.objects = scan
                .expand(idx, neighbors)?
                .into_iter()
                .map(|i| &objects[i])
                .collect();
            clusters.push(cluster);
        }

        debug!(
            clusters = clusters.len(),
            noise = scan.noise.len(),
            epsilon = settings.epsilon,
            min_points = settings.min_points,
            "dbscan finished"
        );

        if !scan.noise.is_empty() {
            let mut noise = Cluster::new(names.next_name(NOISE_PREFIX), ClusterKind::Noise);
            noise.objects = objects
                .iter()
                .filter(|o| scan.noise.contains(&o.id))
                .collect();
            clusters.push(noise);
        }

        sort_by_size(&mut clusters);
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::point;

    fn run(objects: &[DataObject], epsilon: f64, min_points: usize) -> Vec<Cluster<'_>> {
        Dbscan::new()
            .cluster(objects, &DbscanSettings::new(epsilon, min_points), &mut NameGenerator::new())
            .unwrap()
    }

    fn assert_partition(objects: &[DataObject], clusters: &[Cluster<'_>]) {
        let mut seen: Vec<u64> = clusters.iter().flat_map(Cluster::member_ids).collect();
        seen.sort_unstable();
        let mut expected: Vec<u64> = objects.iter().map(|o| o.id).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_all_noise() {
        let objects = vec![point(1, &[0.0, 0.0]), point(2, &[0.5, 0.5]), point(3, &[1.0, 1.0])];
        let clusters = run(&objects, 0.2, 2);
        assert_eq!(clusters.len(), 1);
        assert!(clusters[0].is_noise());
        assert_eq!(clusters[0].name, "Noise-1");
        assert_eq!(clusters[0].member_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_two_groups_and_outlier() {
        let objects = vec![
            point(1, &[0.0, 0.0]),
            point(2, &[0.05, 0.05]),
            point(3, &[1.0, 1.0]),
            point(4, &[0.95, 0.95]),
            point(5, &[0.5, 0.0]),
        ];
        let clusters = run(&objects, 0.2, 2);
        assert_eq!(clusters.len(), 3);

        let real: Vec<_> = clusters.iter().filter(|c| !c.is_noise()).collect();
        assert_eq!(real.len(), 2);
        assert_eq!(real[0].member_ids(), vec![1, 2]);
        assert_eq!(real[1].member_ids(), vec![3, 4]);
        assert_eq!(real[0].name, "DBSCAN-1");

        let noise = clusters.iter().find(|c| c.is_noise()).unwrap();
        assert_eq!(noise.member_ids(), vec![5]);
        assert_partition(&objects, &clusters);
    }

    #[test]
    fn test_self_counts_toward_min_points() {
        let objects = vec![point(1, &[0.0]), point(2, &[0.1])];
        // one neighbor + itself reaches min_points = 2
        let clusters = run(&objects, 0.15, 2);
        assert_eq!(clusters.len(), 1);
        assert!(!clusters[0].is_noise());
        // but not 3
        let clusters = run(&objects, 0.15, 3);
        assert!(clusters[0].is_noise());
    }

    #[test]
    fn test_chain_expansion() {
        // each point only reaches its direct neighbors
        let objects: Vec<_> = (0..6).map(|i| point(i, &[i as f64 * 0.1])).collect();
        let clusters = run(&objects, 0.11, 3);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 6);
    }

    #[test]
    fn test_border_point_seen_as_noise_first() {
        // object 1 is scanned first and is not core, but it lies within
        // epsilon of core object 2
        let objects = vec![
            point(1, &[0.0]),
            point(2, &[0.1]),
            point(3, &[0.2]),
            point(4, &[0.3]),
        ];
        let clusters = run(&objects, 0.15, 3);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_input() {
        assert!(run(&[], 0.2, 2).is_empty());
    }

    #[test]
    fn test_partition_and_determinism() {
        let objects: Vec<_> = (0..30)
            .map(|i| point(i, &[((i * 7) % 11) as f64 / 10.0, ((i * 3) % 5) as f64 / 4.0]))
            .collect();
        let first = run(&objects, 0.15, 3);
        let second = run(&objects, 0.15, 3);
        assert_eq!(first, second);
        assert_partition(&objects, &first);
    }

    #[test]
    fn test_sorted_by_size() {
        let objects = vec![
            point(1, &[0.0]),
            point(2, &[0.01]),
            point(3, &[0.5]),
            point(4, &[0.51]),
            point(5, &[0.52]),
        ];
        let clusters = run(&objects, 0.05, 2);
        assert_eq!(clusters[0].member_ids(), vec![3, 4, 5]);
        assert_eq!(clusters[0].name, "DBSCAN-2");
        assert_eq!(clusters[1].member_ids(), vec![1, 2]);
    }
}
