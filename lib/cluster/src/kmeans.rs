//! K-Means clustering with deterministic seeding.
//!
//! # Seeding
//!
//! Instead of random initialization the object range `[0, n)` is split into
//! `k` equal segments and the object at the middle of each segment becomes
//! that cluster's initial centroid. The same input therefore always produces
//! the same clusters, which keeps results cacheable.
//!
//! # Iteration
//!
//! 1. **Assign**: every object goes to the nearest centroid (ties go to the
//!    lowest cluster index)
//! 2. **Converge**: stop when no object changed cluster since the previous
//!    iteration
//! 3. **Update**: numeric features become the member mean, one-hot bits the
//!    majority vote (set when at least half the members have it). Empty
//!    clusters keep their previous centroid.

use crate::cluster::{sort_by_size, Cluster, ClusterKind};
use crate::naming::{NameGenerator, KMEANS_PREFIX};
use crate::settings::{ClusterSettings, KMeansSettings};
use crate::traits::{extract_features, Clusterer};
use simlens_core::{
    DataObject, DistanceCalculator, Error, FeatureVectors, MetricFactory, ParameterValue, Result,
    StandardMetrics, ValueData,
};
use tracing::{debug, warn};

/// K-Means clusterer.
#[derive(Debug, Clone, Default)]
pub struct KMeans<F = StandardMetrics> {
    calculator: DistanceCalculator<F>,
}

impl KMeans<StandardMetrics> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: MetricFactory> KMeans<F> {
    pub fn with_calculator(calculator: DistanceCalculator<F>) -> Self {
        Self { calculator }
    }

    /// Index of the initial centroid for each of `k` segments of `[0, n)`
    fn seed_indices(n: usize, k: usize) -> Vec<usize> {
        let segment = n / k;
        (0..k)
            .map(|i| (i * segment + segment / 2).min(n - 1))
            .collect()
    }

    fn nearest(
        &self,
        features: &FeatureVectors,
        centroids: &[FeatureVectors],
        settings: &KMeansSettings,
    ) -> Result<usize> {
        let metrics = settings.metrics();
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = self.calculator.calculate_features(
                features,
                centroid,
                metrics.numeric_metric,
                metrics.categorical_metric,
            )?;
            if d < best_distance {
                best = c;
                best_distance = d;
            }
        }
        Ok(best)
    }
}

/// Mean of numeric features, majority vote of one-hot bits
fn compute_centroid(members: &[&FeatureVectors]) -> Option<FeatureVectors> {
    let first = members.first()?;
    let count = members.len() as f64;

    let mut numeric = vec![0.0; first.numeric.len()];
    let mut bit_counts = vec![0usize; first.categorical.len()];
    for member in members {
        for (sum, x) in numeric.iter_mut().zip(&member.numeric) {
            *sum += x;
        }
        for (on, &bit) in bit_counts.iter_mut().zip(&member.categorical) {
            *on += usize::from(bit != 0);
        }
    }

    Some(FeatureVectors {
        numeric: numeric.into_iter().map(|s| s / count).collect(),
        categorical: bit_counts
            .into_iter()
            .map(|on| u8::from(on as f64 / count >= 0.5))
            .collect(),
    })
}

/// Rebuild a centroid as a synthetic object shaped like `template`
fn centroid_object(name: &str, template: &DataObject, features: &FeatureVectors) -> DataObject {
    let mut ordered: Vec<&ParameterValue> = template
        .values()
        .iter()
        .filter(|v| v.parameter.is_active && v.is_normalized())
        .collect();
    ordered.sort_by_key(|v| v.parameter_id());

    let mut numeric = features.numeric.iter();
    let mut offset = 0;
    let values = ordered
        .into_iter()
        .map(|v| {
            let data = match &v.data {
                ValueData::Numeric { .. } => ValueData::Numeric {
                    normalized: numeric.next().copied().unwrap_or_default(),
                },
                ValueData::Categorical { one_hot } => {
                    let end = (offset + one_hot.len()).min(features.categorical.len());
                    let bits = features.categorical[offset.min(end)..end].to_vec();
                    offset = end;
                    ValueData::Categorical { one_hot: bits }
                }
                ValueData::Raw => ValueData::Raw,
            };
            ParameterValue {
                id: v.id,
                raw_value: String::new(),
                parameter: v.parameter.clone(),
                data,
            }
        })
        .collect();

    DataObject::new(template.id, format!("{} centroid", name), values)
}

impl<F: MetricFactory> Clusterer for KMeans<F> {
    type Settings = KMeansSettings;

    fn cluster<'a>(
        &self,
        objects: &'a [DataObject],
        settings: &KMeansSettings,
        names: &mut NameGenerator,
    ) -> Result<Vec<Cluster<'a>>> {
        settings.validate()?;

        let n = objects.len();
        let k = settings.number_of_clusters;
        if n < k {
            return Err(Error::InsufficientObjects {
                requested: k,
                available: n,
            });
        }

        let features = extract_features(objects)?;
        let seeds = Self::seed_indices(n, k);
        let mut centroids: Vec<FeatureVectors> = seeds.iter().map(|&i| features[i].clone()).collect();

        let mut assignments: Vec<Option<usize>> = vec![None; n];
        let mut converged = false;
        let mut iterations = 0;

        while iterations < settings.max_iterations {
            iterations += 1;

            let mut changed = 0usize;
            for (i, f) in features.iter().enumerate() {
                let nearest = self.nearest(f, &centroids, settings)?;
                if assignments[i] != Some(nearest) {
                    assignments[i] = Some(nearest);
                    changed += 1;
                }
            }

            if changed == 0 {
                converged = true;
                break;
            }
            debug!(iteration = iterations, reassigned = changed, "k-means assignment step");

            for (c, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&FeatureVectors> = features
                    .iter()
                    .zip(&assignments)
                    .filter(|(_, a)| **a == Some(c))
                    .map(|(f, _)| f)
                    .collect();
                if let Some(updated) = compute_centroid(&members) {
                    *centroid = updated;
                }
            }
        }

        if converged {
            debug!(iterations, clusters = k, "k-means converged");
        } else {
            warn!(
                max_iterations = settings.max_iterations,
                "k-means stopped before assignments stabilized"
            );
        }

        let mut clusters: Vec<Cluster<'a>> = centroids
            .iter()
            .zip(&seeds)
            .map(|(centroid, &seed)| {
                let name = names.next_name(KMEANS_PREFIX);
                let centroid = centroid_object(&name, &objects[seed], centroid);
                Cluster::new(name, ClusterKind::KMeans { centroid })
            })
            .collect();

        for (object, assignment) in objects.iter().zip(&assignments) {
            if let Some(c) = assignment {
                clusters[*c].objects.push(object);
            }
        }

        sort_by_size(&mut clusters);
        Ok(clusters)
    }
}
