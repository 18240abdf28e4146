//! Algorithm settings
//!
//! Every settings type carries the metric selection plus its own
//! algorithm-specific fields, and deserializes from camelCase JSON with
//! defaults for anything left out.

use serde::{Deserialize, Serialize};
use simlens_core::{CategoricalMetric, Error, NumericMetric, Result};

/// Settings shared by all clustering algorithms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricSettings {
    pub numeric_metric: NumericMetric,
    pub categorical_metric: CategoricalMetric,
    /// Output shaping only; the algorithms ignore it
    pub include_parameters: bool,
}

/// Common view over the per-algorithm settings types
pub trait ClusterSettings {
    fn metrics(&self) -> &MetricSettings;

    /// Reject values no run could succeed with
    fn validate(&self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KMeansSettings {
    #[serde(flatten)]
    pub metrics: MetricSettings,
    pub number_of_clusters: usize,
    pub max_iterations: usize,
}

impl Default for KMeansSettings {
    fn default() -> Self {
        Self {
            metrics: MetricSettings::default(),
            number_of_clusters: 3,
            max_iterations: 100,
        }
    }
}

impl KMeansSettings {
    pub fn new(number_of_clusters: usize, max_iterations: usize) -> Self {
        Self {
            number_of_clusters,
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_numeric_metric(mut self, metric: NumericMetric) -> Self {
        self.metrics.numeric_metric = metric;
        self
    }

    pub fn with_categorical_metric(mut self, metric: CategoricalMetric) -> Self {
        self.metrics.categorical_metric = metric;
        self
    }
}

impl ClusterSettings for KMeansSettings {
    fn metrics(&self) -> &MetricSettings {
        &self.metrics
    }

    fn validate(&self) -> Result<()> {
        if self.number_of_clusters == 0 {
            return Err(Error::InvalidSettings("numberOfClusters must be at least 1".into()));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidSettings("maxIterations must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DbscanSettings {
    #[serde(flatten)]
    pub metrics: MetricSettings,
    /// Maximum distance for two objects to be neighbors
    pub epsilon: f64,
    /// Neighborhood size, the point itself included, that makes a core point
    pub min_points: usize,
}

impl Default for DbscanSettings {
    fn default() -> Self {
        Self {
            metrics: MetricSettings::default(),
            epsilon: 0.5,
            min_points: 3,
        }
    }
}

impl DbscanSettings {
    pub fn new(epsilon: f64, min_points: usize) -> Self {
        Self {
            epsilon,
            min_points,
            ..Self::default()
        }
    }

    pub fn with_numeric_metric(mut self, metric: NumericMetric) -> Self {
        self.metrics.numeric_metric = metric;
        self
    }

    pub fn with_categorical_metric(mut self, metric: CategoricalMetric) -> Self {
        self.metrics.categorical_metric = metric;
        self
    }
}

impl ClusterSettings for DbscanSettings {
    fn metrics(&self) -> &MetricSettings {
        &self.metrics
    }

    fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "epsilon must be a non-negative number, got {}",
                self.epsilon
            )));
        }
        if self.min_points == 0 {
            return Err(Error::InvalidSettings("minPoints must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AgglomerativeSettings {
    #[serde(flatten)]
    pub metrics: MetricSettings,
    /// Merging stops once the closest pair of clusters is farther apart than this
    pub threshold: f64,
}

impl Default for AgglomerativeSettings {
    fn default() -> Self {
        Self {
            metrics: MetricSettings::default(),
            threshold: 0.5,
        }
    }
}

impl AgglomerativeSettings {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn with_numeric_metric(mut self, metric: NumericMetric) -> Self {
        self.metrics.numeric_metric = metric;
        self
    }

    pub fn with_categorical_metric(mut self, metric: CategoricalMetric) -> Self {
        self.metrics.categorical_metric = metric;
        self
    }
}

impl ClusterSettings for AgglomerativeSettings {
    fn metrics(&self) -> &MetricSettings {
        &self.metrics
    }

    fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let kmeans: KMeansSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(kmeans, KMeansSettings::default());

        let dbscan: DbscanSettings = serde_json::from_str(r#"{"epsilon": 0.2}"#).unwrap();
        assert_eq!(dbscan.epsilon, 0.2);
        assert_eq!(dbscan.min_points, 3);
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "numericMetric": "manhattan",
            "categoricalMetric": "jaccard",
            "includeParameters": true,
            "numberOfClusters": 4,
            "maxIterations": 20
        }"#;
        let settings: KMeansSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.metrics.numeric_metric, NumericMetric::Manhattan);
        assert_eq!(settings.metrics.categorical_metric, CategoricalMetric::Jaccard);
        assert!(settings.metrics.include_parameters);
        assert_eq!(settings.number_of_clusters, 4);
        assert_eq!(settings.max_iterations, 20);
    }

    #[test]
    fn test_validation() {
        assert!(KMeansSettings::new(0, 10).validate().is_err());
        assert!(KMeansSettings::new(2, 0).validate().is_err());
        assert!(KMeansSettings::new(2, 10).validate().is_ok());
        assert!(DbscanSettings::new(-0.1, 2).validate().is_err());
        assert!(DbscanSettings::new(f64::NAN, 2).validate().is_err());
        assert!(DbscanSettings::new(0.2, 0).validate().is_err());
        assert!(AgglomerativeSettings::new(f64::NAN).validate().is_err());
        assert!(AgglomerativeSettings::new(0.0).validate().is_ok());
    }
}
