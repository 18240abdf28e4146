//! Principal component projection to two dimensions

use crate::eigen::JacobiSolver;
use crate::matrix::MatrixProcessor;
use serde::{Deserialize, Serialize};
use simlens_core::{DataObject, Error, FeatureVectors, ObjectId, Result, VectorKind};
use tracing::debug;

/// 2D position of one object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectCoordinate {
    pub object_id: ObjectId,
    pub x: f64,
    pub y: f64,
}

/// Output of a reduction, one coordinate per input object in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReductionResult {
    pub object_coordinates: Vec<ObjectCoordinate>,
}

/// PCA onto the two eigenvectors of the covariance matrix with the largest eigenvalues
#[derive(Debug, Clone, Default)]
pub struct PcaReducer {
    solver: JacobiSolver,
}

impl PcaReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solver(solver: JacobiSolver) -> Self {
        Self { solver }
    }

    /// Project every object to `(x, y)`.
    ///
    /// Numeric features are used as-is and every one-hot bit is its own
    /// column. Objects without any feature map to the origin.
    pub fn reduce_dimensions(&self, objects: &[DataObject]) -> Result<ReductionResult> {
        let features = objects
            .iter()
            .map(FeatureVectors::from_object)
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = features.first() {
            for f in &features[1..] {
                check_shape(first, f)?;
            }
        }

        let columns = features.first().map_or(0, FeatureVectors::len);
        if columns == 0 {
            return Ok(origin(objects));
        }

        let mut matrix: Vec<Vec<f64>> = features.iter().map(FeatureVectors::to_row).collect();
        MatrixProcessor::center(&mut matrix);
        let covariance = MatrixProcessor::covariance(&matrix);
        let decomposition = self.solver.decompose(&covariance)?;

        let order = decomposition.order_by_eigenvalue();
        let first = oriented(decomposition.eigenvector(order[0]));
        let second = order.get(1).map(|&k| oriented(decomposition.eigenvector(k)));

        debug!(
            objects = objects.len(),
            features = columns,
            jacobi_iterations = decomposition.iterations,
            "pca projection"
        );

        let object_coordinates = objects
            .iter()
            .zip(&matrix)
            .map(|(object, row)| ObjectCoordinate {
                object_id: object.id,
                x: dot(row, &first),
                y: second.as_ref().map_or(0.0, |v| dot(row, v)),
            })
            .collect();

        Ok(ReductionResult { object_coordinates })
    }
}

fn check_shape(expected: &FeatureVectors, actual: &FeatureVectors) -> Result<()> {
    if expected.numeric.len() != actual.numeric.len() {
        return Err(Error::VectorLengthMismatch {
            kind: VectorKind::Numeric,
            left: expected.numeric.len(),
            right: actual.numeric.len(),
        });
    }
    if expected.categorical.len() != actual.categorical.len() {
        return Err(Error::VectorLengthMismatch {
            kind: VectorKind::Categorical,
            left: expected.categorical.len(),
            right: actual.categorical.len(),
        });
    }
    Ok(())
}

fn origin(objects: &[DataObject]) -> ReductionResult {
    ReductionResult {
        object_coordinates: objects
            .iter()
            .map(|o| ObjectCoordinate {
                object_id: o.id,
                x: 0.0,
                y: 0.0,
            })
            .collect(),
    }
}

/// Flip `v` so its largest-magnitude component is positive
fn oriented(mut v: Vec<f64>) -> Vec<f64> {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        v.iter_mut().for_each(|x| *x = -*x);
    }
    v
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simlens_core::{ParameterState, ParameterValue};

    fn object(id: u64, coords: &[f64], one_hot: Option<Vec<u8>>) -> DataObject {
        let mut values: Vec<ParameterValue> = coords
            .iter()
            .enumerate()
            .map(|(i, &x)| ParameterValue::numeric(i as u64, ParameterState::numeric(i as u64, format!("x{}", i)), x))
            .collect();
        if let Some(bits) = one_hot {
            values.push(ParameterValue::categorical(99, ParameterState::categorical(99, "c"), bits));
        }
        DataObject::new(id, format!("o{}", id), values)
    }

    fn variance(xs: &[f64]) -> f64 {
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64
    }

    #[test]
    fn test_one_coordinate_per_object() {
        let objects: Vec<_> = (0..7)
            .map(|i| object(i, &[i as f64 / 7.0, (i % 3) as f64 / 3.0, 0.5], Some(vec![(i % 2) as u8, 1 - (i % 2) as u8])))
            .collect();
        let result = PcaReducer::new().reduce_dimensions(&objects).unwrap();
        assert_eq!(result.object_coordinates.len(), 7);
        let ids: Vec<u64> = result.object_coordinates.iter().map(|c| c.object_id).collect();
        assert_eq!(ids, (0..7).collect::<Vec<u64>>());
        assert!(result.object_coordinates.iter().all(|c| c.x.is_finite() && c.y.is_finite()));
    }

    #[test]
    fn test_identical_points_at_origin() {
        let objects: Vec<_> = (0..4).map(|i| object(i, &[0.3, 0.6], Some(vec![1, 0]))).collect();
        let result = PcaReducer::new().reduce_dimensions(&objects).unwrap();
        for c in &result.object_coordinates {
            assert!(c.x.abs() < 1e-12 && c.y.abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_features_at_origin() {
        let objects = vec![DataObject::new(1, "a", vec![]), DataObject::new(2, "b", vec![])];
        let result = PcaReducer::new().reduce_dimensions(&objects).unwrap();
        assert_eq!(
            result.object_coordinates,
            vec![
                ObjectCoordinate { object_id: 1, x: 0.0, y: 0.0 },
                ObjectCoordinate { object_id: 2, x: 0.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let result = PcaReducer::new().reduce_dimensions(&[]).unwrap();
        assert!(result.object_coordinates.is_empty());
    }

    #[test]
    fn test_linear_axis_has_variance() {
        let objects: Vec<_> = (0..10).map(|i| object(i, &[i as f64 / 10.0, 0.5], None)).collect();
        let result = PcaReducer::new().reduce_dimensions(&objects).unwrap();
        let xs: Vec<f64> = result.object_coordinates.iter().map(|c| c.x).collect();
        let ys: Vec<f64> = result.object_coordinates.iter().map(|c| c.y).collect();
        assert!(variance(&xs) > 1e-3);
        assert!(variance(&ys) < 1e-12);
        // the first component follows the increasing axis
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_single_feature_has_zero_y() {
        let objects: Vec<_> = (0..5).map(|i| object(i, &[i as f64], None)).collect();
        let result = PcaReducer::new().reduce_dimensions(&objects).unwrap();
        assert!(result.object_coordinates.iter().all(|c| c.y == 0.0));
        assert!((result.object_coordinates[0].x + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_object_at_origin() {
        let result = PcaReducer::new().reduce_dimensions(&[object(1, &[0.2, 0.9], None)]).unwrap();
        assert_eq!(result.object_coordinates[0], ObjectCoordinate { object_id: 1, x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_deterministic() {
        let objects: Vec<_> = (0..9)
            .map(|i| object(i, &[(i * 2 % 9) as f64 / 9.0, (i * 5 % 9) as f64 / 9.0, (i % 4) as f64 / 4.0], None))
            .collect();
        let reducer = PcaReducer::new();
        assert_eq!(
            reducer.reduce_dimensions(&objects).unwrap(),
            reducer.reduce_dimensions(&objects).unwrap()
        );
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let objects = vec![object(1, &[0.1, 0.2], None), object(2, &[0.1], None)];
        assert!(matches!(
            PcaReducer::new().reduce_dimensions(&objects),
            Err(Error::VectorLengthMismatch { .. })
        ));
    }
}
