//! Weighted mixed-type distance between two objects

use crate::error::{Error, Result, VectorKind};
use crate::metric::{CategoricalMetric, MetricFactory, NumericMetric, StandardMetrics};
use crate::model::{DataObject, ValueData};

/// Comparable features of one object
///
/// Numeric values and one-hot bits are laid out in parameter id order;
/// inactive parameters and raw (unnormalized) values contribute nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVectors {
    pub numeric: Vec<f64>,
    pub categorical: Vec<u8>,
}

impl FeatureVectors {
    pub fn from_object(object: &DataObject) -> Result<Self> {
        let values = object.values.as_ref().ok_or(Error::VectorNull(object.id))?;

        let mut ordered: Vec<_> = values.iter().filter(|v| v.parameter.is_active).collect();
        ordered.sort_by_key(|v| v.parameter_id());

        let mut features = FeatureVectors::default();
        for value in ordered {
            match &value.data {
                ValueData::Numeric { normalized } => features.numeric.push(*normalized),
                ValueData::Categorical { one_hot } => features.categorical.extend_from_slice(one_hot),
                ValueData::Raw => {}
            }
        }
        Ok(features)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All features as one row, one-hot bits widened to `f64`
    pub fn to_row(&self) -> Vec<f64> {
        self.numeric
            .iter()
            .copied()
            .chain(self.categorical.iter().map(|&b| b as f64))
            .collect()
    }
}

/// Combines a numeric and a categorical metric into one object distance.
///
/// When both groups are present the result is the average of the two group
/// distances weighted by how many scalar features each group contributes.
#[derive(Debug, Clone, Default)]
pub struct DistanceCalculator<F = StandardMetrics> {
    metrics: F,
}

impl DistanceCalculator<StandardMetrics> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: MetricFactory> DistanceCalculator<F> {
    pub fn with_metrics(metrics: F) -> Self {
        Self { metrics }
    }

    pub fn calculate(
        &self,
        a: &DataObject,
        b: &DataObject,
        numeric: NumericMetric,
        categorical: CategoricalMetric,
    ) -> Result<f64> {
        let fa = FeatureVectors::from_object(a)?;
        let fb = FeatureVectors::from_object(b)?;
        self.calculate_features(&fa, &fb, numeric, categorical)
    }

    /// Same as [`calculate`](Self::calculate) on pre-extracted features
    pub fn calculate_features(
        &self,
        a: &FeatureVectors,
        b: &FeatureVectors,
        numeric: NumericMetric,
        categorical: CategoricalMetric,
    ) -> Result<f64> {
        if a.numeric.len() != b.numeric.len() {
            return Err(Error::VectorLengthMismatch {
                kind: VectorKind::Numeric,
                left: a.numeric.len(),
                right: b.numeric.len(),
            });
        }
        if a.categorical.len() != b.categorical.len() {
            return Err(Error::VectorLengthMismatch {
                kind: VectorKind::Categorical,
                left: a.categorical.len(),
                right: b.categorical.len(),
            });
        }
        if a.is_empty() {
            return Err(Error::EmptyVector);
        }

        let numeric_count = a.numeric.len();
        let categorical_count = a.categorical.len();

        let distance = match (numeric_count, categorical_count) {
            (_, 0) => self.metrics.numeric(numeric).calculate(&a.numeric, &b.numeric),
            (0, _) => self
                .metrics
                .categorical(categorical)
                .calculate(&a.categorical, &b.categorical),
            _ => {
                let nd = self.metrics.numeric(numeric).calculate(&a.numeric, &b.numeric);
                let cd = self
                    .metrics
                    .categorical(categorical)
                    .calculate(&a.categorical, &b.categorical);
                (nd * numeric_count as f64 + cd * categorical_count as f64)
                    / (numeric_count + categorical_count) as f64
            }
        };

        Ok(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::DistanceMetric;
    use crate::model::{ParameterState, ParameterValue};

    fn numeric_object(id: u64, values: &[f64]) -> DataObject {
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                ParameterValue::numeric(i as u64, ParameterState::numeric(i as u64, format!("n{}", i)), *v)
            })
            .collect();
        DataObject::new(id, format!("obj{}", id), values)
    }

    fn mixed_object(id: u64, numeric: &[f64], one_hot: Vec<u8>) -> DataObject {
        let mut obj = numeric_object(id, numeric);
        let param = ParameterState::categorical(100, "color");
        if let Some(values) = obj.values.as_mut() {
            values.push(ParameterValue::categorical(100, param, one_hot));
        }
        obj
    }

    struct FixedNumeric;
    struct FixedCategorical;

    impl DistanceMetric<f64> for FixedNumeric {
        fn calculate(&self, _: &[f64], _: &[f64]) -> f64 {
            0.8
        }
    }

    impl DistanceMetric<u8> for FixedCategorical {
        fn calculate(&self, _: &[u8], _: &[u8]) -> f64 {
            0.2
        }
    }

    struct FixedMetrics;

    impl MetricFactory for FixedMetrics {
        fn numeric(&self, _: NumericMetric) -> &dyn DistanceMetric<f64> {
            &FixedNumeric
        }

        fn categorical(&self, _: CategoricalMetric) -> &dyn DistanceMetric<u8> {
            &FixedCategorical
        }
    }

    #[test]
    fn test_numeric_only() {
        let calc = DistanceCalculator::new();
        let a = numeric_object(1, &[0.0, 0.0]);
        let b = numeric_object(2, &[0.3, 0.4]);
        let d = calc
            .calculate(&a, &b, NumericMetric::Euclidean, CategoricalMetric::Hamming)
            .unwrap();
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_categorical_only() {
        let calc = DistanceCalculator::new();
        let a = mixed_object(1, &[], vec![1, 0, 0, 0]);
        let b = mixed_object(2, &[], vec![0, 1, 0, 0]);
        let d = calc
            .calculate(&a, &b, NumericMetric::Euclidean, CategoricalMetric::Hamming)
            .unwrap();
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_average_by_feature_count() {
        let calc = DistanceCalculator::with_metrics(FixedMetrics);
        let a = mixed_object(1, &[0.1, 0.2], vec![1, 0, 0]);
        let b = mixed_object(2, &[0.5, 0.9], vec![0, 1, 0]);
        let d = calc
            .calculate(&a, &b, NumericMetric::Euclidean, CategoricalMetric::Hamming)
            .unwrap();
        // (0.8 * 2 + 0.2 * 3) / 5
        assert!((d - 0.44).abs() < 1e-12, "got {}", d);
    }

    #[test]
    fn test_mixed_with_standard_metrics() {
        let calc = DistanceCalculator::new();
        let a = mixed_object(1, &[0.0], vec![1, 0]);
        let b = mixed_object(2, &[1.0], vec![1, 0]);
        let d = calc
            .calculate(&a, &b, NumericMetric::Manhattan, CategoricalMetric::Hamming)
            .unwrap();
        // numeric 1.0 over 1 feature, categorical 0.0 over 2 features
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_null_vector() {
        let calc = DistanceCalculator::new();
        let a = DataObject::without_values(1, "a");
        let b = numeric_object(2, &[0.5]);
        assert_eq!(
            calc.calculate(&a, &b, NumericMetric::Euclidean, CategoricalMetric::Hamming),
            Err(Error::VectorNull(1))
        );
        assert_eq!(
            calc.calculate(&b, &a, NumericMetric::Euclidean, CategoricalMetric::Hamming),
            Err(Error::VectorNull(1))
        );
    }

    #[test]
    fn test_length_mismatch() {
        let calc = DistanceCalculator::new();
        let a = numeric_object(1, &[0.1, 0.2]);
        let b = numeric_object(2, &[0.1, 0.2, 0.3]);
        assert!(matches!(
            calc.calculate(&a, &b, NumericMetric::Euclidean, CategoricalMetric::Hamming),
            Err(Error::VectorLengthMismatch { kind: VectorKind::Numeric, left: 2, right: 3 })
        ));

        let c = mixed_object(3, &[0.1], vec![1, 0]);
        let d = mixed_object(4, &[0.1], vec![1, 0, 0]);
        assert!(matches!(
            calc.calculate(&c, &d, NumericMetric::Euclidean, CategoricalMetric::Hamming),
            Err(Error::VectorLengthMismatch { kind: VectorKind::Categorical, .. })
        ));
    }

    #[test]
    fn test_empty_vectors() {
        let calc = DistanceCalculator::new();
        let a = DataObject::new(1, "a", vec![]);
        let b = DataObject::new(2, "b", vec![]);
        assert_eq!(
            calc.calculate(&a, &b, NumericMetric::Euclidean, CategoricalMetric::Hamming),
            Err(Error::EmptyVector)
        );
    }

    #[test]
    fn test_symmetry() {
        let calc = DistanceCalculator::new();
        let a = mixed_object(1, &[0.1, 0.7], vec![1, 0, 1]);
        let b = mixed_object(2, &[0.4, 0.2], vec![0, 0, 1]);
        for n in [NumericMetric::Euclidean, NumericMetric::Manhattan, NumericMetric::Cosine] {
            for c in [CategoricalMetric::Hamming, CategoricalMetric::Jaccard] {
                let ab = calc.calculate(&a, &b, n, c).unwrap();
                let ba = calc.calculate(&b, &a, n, c).unwrap();
                assert_eq!(ab, ba);
            }
        }
    }

    #[test]
    fn test_features_ordered_by_parameter_id() {
        let p1 = ParameterState::numeric(1, "a");
        let p2 = ParameterState::numeric(2, "b");
        let obj = DataObject::new(
            1,
            "x",
            vec![
                ParameterValue::numeric(2, p2, 0.9),
                ParameterValue::numeric(1, p1, 0.1),
            ],
        );
        let features = FeatureVectors::from_object(&obj).unwrap();
        assert_eq!(features.numeric, vec![0.1, 0.9]);
    }

    #[test]
    fn test_inactive_and_raw_values_skipped() {
        let active = ParameterState::numeric(1, "a");
        let inactive = ParameterState::numeric(2, "b").inactive();
        let raw = ParameterState::categorical(3, "c");
        let obj = DataObject::new(
            1,
            "x",
            vec![
                ParameterValue::numeric(1, active, 0.5),
                ParameterValue::numeric(2, inactive, 0.7),
                ParameterValue::raw(3, raw, "Red"),
            ],
        );
        let features = FeatureVectors::from_object(&obj).unwrap();
        assert_eq!(features.numeric, vec![0.5]);
        assert!(features.categorical.is_empty());
    }
}
