//! Bottom-up agglomerative clustering with average linkage.
//!
//! Every object starts as its own cluster. Each round merges the two live
//! clusters with the lowest average pairwise object distance, until only one
//! cluster is left or the closest pair is farther apart than the threshold.
//!
//! Merged clusters are flagged rather than removed so cluster indices stay
//! stable during the pair search; they are dropped from the final result.
//! Surviving clusters are named once merging is done, in the order of their
//! first object, so names carry no gaps.
//!
//! ## Complexity
//!
//! Object distances are computed once (n²/2 evaluations). Each round scans
//! all live cluster pairs, so the whole run is roughly O(n³) in the worst
//! case. Intended for interactive dataset sizes.

use crate::cluster::{sort_by_size, Cluster, ClusterKind};
use crate::naming::{NameGenerator, AGGLOMERATIVE_PREFIX};
use crate::settings::{AgglomerativeSettings, ClusterSettings};
use crate::traits::{extract_features, Clusterer};
use simlens_core::{DataObject, DistanceCalculator, MetricFactory, Result, StandardMetrics};
use tracing::{debug, trace};

/// Agglomerative (average-linkage) clusterer.
#[derive(Debug, Clone, Default)]
pub struct Agglomerative<F = StandardMetrics> {
    calculator: DistanceCalculator<F>,
}

impl Agglomerative<StandardMetrics> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: MetricFactory> Agglomerative<F> {
    pub fn with_calculator(calculator: DistanceCalculator<F>) -> Self {
        Self { calculator }
    }

    /// Symmetric matrix of object distances
    fn distance_matrix(
        &self,
        objects: &[DataObject],
        settings: &AgglomerativeSettings,
    ) -> Result<Vec<Vec<f64>>> {
        let metrics = settings.metrics();
        let features = extract_features(objects)?;
        let n = objects.len();

        let mut distances = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.calculator.calculate_features(
                    &features[i],
                    &features[j],
                    metrics.numeric_metric,
                    metrics.categorical_metric,
                )?;
                distances[i][j] = d;
                distances[j][i] = d;
            }
        }
        Ok(distances)
    }
}

/// Mean distance over all `|a| * |b|` object pairs
fn average_linkage(a: &[usize], b: &[usize], distances: &[Vec<f64>]) -> f64 {
    let total: f64 = a
        .iter()
        .flat_map(|&i| b.iter().map(move |&j| distances[i][j]))
        .sum();
    total / (a.len() * b.len()) as f64
}

impl<F: MetricFactory> Clusterer for Agglomerative<F> {
    type Settings = AgglomerativeSettings;

    fn cluster<'a>(
        &self,
        objects: &'a [DataObject],
        settings: &AgglomerativeSettings,
        names: &mut NameGenerator,
    ) -> Result<Vec<Cluster<'a>>> {
        settings.validate()?;

        let distances = self.distance_matrix(objects, settings)?;

        let mut members: Vec<Vec<usize>> = (0..objects.len()).map(|i| vec![i]).collect();
        let mut clusters: Vec<Cluster<'a>> = objects
            .iter()
            .map(|object| {
                let mut cluster =
                    Cluster::new(String::new(), ClusterKind::Agglomerative { is_merged: false });
                cluster.objects.push(object);
                cluster
            })
            .collect();

        let mut live = clusters.len();
        let mut merges = 0usize;
        while live > 1 {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in 0..clusters.len() {
                if clusters[i].is_merged() {
                    continue;
                }
                for j in (i + 1)..clusters.len() {
                    if clusters[j].is_merged() {
                        continue;
                    }
                    let d = average_linkage(&members[i], &members[j], &distances);
                    if best.map_or(true, |(_, _, b)| d < b) {
                        best = Some((i, j, d));
                    }
                }
            }

            let Some((i, j, d)) = best else { break };
            if d > settings.threshold {
                debug!(distance = d, threshold = settings.threshold, "closest clusters exceed threshold");
                break;
            }

            trace!(into = i, from = j, distance = d, "merging clusters");
            let moved = std::mem::take(&mut clusters[j].objects);
            clusters[i].objects.extend(moved);
            clusters[j].kind = ClusterKind::Agglomerative { is_merged: true };
            let moved = std::mem::take(&mut members[j]);
            members[i].extend(moved);

            live -= 1;
            merges += 1;
        }

        debug!(objects = objects.len(), merges, clusters = live, "agglomerative clustering finished");

        let mut result: Vec<Cluster<'a>> = clusters.into_iter().filter(|c| !c.is_merged()).collect();
        for cluster in &mut result {
            cluster.name = names.next_name(AGGLOMERATIVE_PREFIX);
        }
        sort_by_size(&mut result);
        Ok(result)
    }
}
