//! Distance metrics over equal-length vectors
//!
//! Numeric metrics work on normalized `f64` features, categorical metrics on
//! one-hot bit vectors (possibly concatenated across several parameters).
//! Every metric returns a distance where 0.0 means identical.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A distance function over vectors of a single primitive type.
///
/// Callers guarantee `a.len() == b.len()`.
pub trait DistanceMetric<T>: Send + Sync {
    fn calculate(&self, a: &[T], b: &[T]) -> f64;
}

/// Selectable numeric metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumericMetric {
    #[default]
    Euclidean,
    Manhattan,
    Cosine,
}

/// Selectable categorical metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoricalMetric {
    #[default]
    Hamming,
    Jaccard,
}

impl FromStr for NumericMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(NumericMetric::Euclidean),
            "manhattan" => Ok(NumericMetric::Manhattan),
            "cosine" => Ok(NumericMetric::Cosine),
            other => Err(Error::InvalidSettings(format!("unknown numeric metric '{}'", other))),
        }
    }
}

impl FromStr for CategoricalMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hamming" => Ok(CategoricalMetric::Hamming),
            "jaccard" => Ok(CategoricalMetric::Jaccard),
            other => Err(Error::InvalidSettings(format!(
                "unknown categorical metric '{}'",
                other
            ))),
        }
    }
}

/// Square root of the summed squared differences
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceMetric<f64> for Euclidean {
    #[inline]
    fn calculate(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Sum of absolute differences
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl DistanceMetric<f64> for Manhattan {
    #[inline]
    fn calculate(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }
}

/// `1 - cos(a, b)`
///
/// A zero-norm vector on either side yields 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl DistanceMetric<f64> for Cosine {
    fn calculate(&self, a: &[f64], b: &[f64]) -> f64 {
        let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }

        let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
        1.0 - similarity
    }
}

/// Fraction of positions that differ
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

impl DistanceMetric<u8> for Hamming {
    fn calculate(&self, a: &[u8], b: &[u8]) -> f64 {
        if a.is_empty() {
            return 0.0;
        }
        let differing = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
        differing as f64 / a.len() as f64
    }
}

/// `1 - |A ∩ B| / |A ∪ B|` over the set bits
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl DistanceMetric<u8> for Jaccard {
    fn calculate(&self, a: &[u8], b: &[u8]) -> f64 {
        let mut intersection = 0usize;
        let mut union = 0usize;
        for (x, y) in a.iter().zip(b.iter()) {
            let (x_on, y_on) = (*x != 0, *y != 0);
            if x_on && y_on {
                intersection += 1;
            }
            if x_on || y_on {
                union += 1;
            }
        }

        if union == 0 {
            return 0.0;
        }
        1.0 - intersection as f64 / union as f64
    }
}

static EUCLIDEAN: Euclidean = Euclidean;
static MANHATTAN: Manhattan = Manhattan;
static COSINE: Cosine = Cosine;
static HAMMING: Hamming = Hamming;
static JACCARD: Jaccard = Jaccard;

/// Resolves metric kinds to their implementations
pub trait MetricFactory: Send + Sync {
    fn numeric(&self, kind: NumericMetric) -> &dyn DistanceMetric<f64>;
    fn categorical(&self, kind: CategoricalMetric) -> &dyn DistanceMetric<u8>;
}

/// Factory backed by the built-in metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl MetricFactory for StandardMetrics {
    fn numeric(&self, kind: NumericMetric) -> &dyn DistanceMetric<f64> {
        match kind {
            NumericMetric::Euclidean => &EUCLIDEAN,
            NumericMetric::Manhattan => &MANHATTAN,
            NumericMetric::Cosine => &COSINE,
        }
    }

    fn categorical(&self, kind: CategoricalMetric) -> &dyn DistanceMetric<u8> {
        match kind {
            CategoricalMetric::Hamming => &HAMMING,
            CategoricalMetric::Jaccard => &JACCARD,
        }
    }
}
