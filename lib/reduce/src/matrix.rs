//! Dense row-major matrix helpers for PCA
//!
//! Matrices are `rows × columns` slices of equal-length rows.

/// Column statistics on row-major matrices
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixProcessor;

impl MatrixProcessor {
    pub fn column_means(matrix: &[Vec<f64>]) -> Vec<f64> {
        let cols = matrix.first().map_or(0, Vec::len);
        if matrix.is_empty() {
            return vec![0.0; cols];
        }

        let mut means = vec![0.0; cols];
        for row in matrix {
            for (mean, x) in means.iter_mut().zip(row) {
                *mean += x;
            }
        }
        let n = matrix.len() as f64;
        means.iter_mut().for_each(|m| *m /= n);
        means
    }

    /// Subtract each column's mean in place; returns the means
    pub fn center(matrix: &mut [Vec<f64>]) -> Vec<f64> {
        let means = Self::column_means(matrix);
        for row in matrix.iter_mut() {
            for (x, mean) in row.iter_mut().zip(&means) {
                *x -= mean;
            }
        }
        means
    }

    /// Sample covariance (`n - 1` denominator) of an already centered matrix
    ///
    /// Fewer than two rows carry no variance; the result is then all zeros.
    pub fn covariance(centered: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let cols = centered.first().map_or(0, Vec::len);
        let mut cov = vec![vec![0.0; cols]; cols];
        if centered.len() < 2 {
            return cov;
        }

        let denom = (centered.len() - 1) as f64;
        for i in 0..cols {
            for j in i..cols {
                let sum: f64 = centered.iter().map(|row| row[i] * row[j]).sum();
                cov[i][j] = sum / denom;
                cov[j][i] = cov[i][j];
            }
        }
        cov
    }
}
