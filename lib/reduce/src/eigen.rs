//! Jacobi eigen-decomposition of real symmetric matrices.
//!
//! Each step picks the largest off-diagonal entry `M[p][q]` and applies the
//! plane rotation that zeroes it:
//!
//! ```text
//! θ = ½·atan(2·M[p][q] / (M[p][p] − M[q][q]))      (π/4 when the diagonal entries match)
//! M ← Jᵀ·M·J,   V ← V·J
//! ```
//!
//! The diagonal of `M` converges to the eigenvalues and the columns of the
//! accumulated rotation `V` to the matching eigenvectors. Iteration stops once
//! no off-diagonal entry exceeds the tolerance, or at the iteration cap.

use ordered_float::OrderedFloat;
use simlens_core::{Error, Result};
use std::cmp::Reverse;
use tracing::{trace, warn};

pub const DEFAULT_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Diagonal entries closer than this use the π/4 rotation
const DIAGONAL_EPSILON: f64 = 1e-12;

/// Eigenvalues and eigenvectors of a symmetric matrix
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    pub eigenvalues: Vec<f64>,
    /// Row-major; column `k` is the eigenvector of `eigenvalues[k]`
    pub eigenvectors: Vec<Vec<f64>>,
    pub iterations: usize,
    pub converged: bool,
}

impl EigenDecomposition {
    pub fn eigenvector(&self, k: usize) -> Vec<f64> {
        self.eigenvectors.iter().map(|row| row[k]).collect()
    }

    /// Column indices by descending eigenvalue; ties keep column order
    pub fn order_by_eigenvalue(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.eigenvalues.len()).collect();
        order.sort_by_key(|&k| Reverse(OrderedFloat(self.eigenvalues[k])));
        order
    }
}

/// Classical Jacobi solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl JacobiSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    pub fn decompose(&self, matrix: &[Vec<f64>]) -> Result<EigenDecomposition> {
        let n = matrix.len();
        if let Some(row) = matrix.iter().find(|row| row.len() != n) {
            return Err(Error::InvalidMatrix(format!(
                "expected a square {}x{} matrix, found a row of length {}",
                n,
                n,
                row.len()
            )));
        }

        let mut a: Vec<Vec<f64>> = matrix.to_vec();
        let mut v = identity(n);
        let mut iterations = 0;
        let mut converged = false;

        loop {
            let (p, q, largest) = largest_off_diagonal(&a);
            if largest < self.tolerance {
                converged = true;
                break;
            }
            if iterations >= self.max_iterations {
                warn!(
                    iterations,
                    off_diagonal = largest,
                    "jacobi solver hit the iteration cap"
                );
                break;
            }

            let diff = a[p][p] - a[q][q];
            let theta = if diff.abs() < DIAGONAL_EPSILON {
                std::f64::consts::FRAC_PI_4
            } else {
                0.5 * (2.0 * a[p][q] / diff).atan()
            };
            rotate(&mut a, &mut v, p, q, theta);
            iterations += 1;
        }

        trace!(size = n, iterations, converged, "jacobi decomposition done");

        Ok(EigenDecomposition {
            eigenvalues: (0..n).map(|i| a[i][i]).collect(),
            eigenvectors: v,
            iterations,
            converged,
        })
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// `(p, q, |a[p][q]|)` of the largest off-diagonal entry, `p < q`
fn largest_off_diagonal(a: &[Vec<f64>]) -> (usize, usize, f64) {
    let mut best = (0, 0, 0.0);
    for (i, row) in a.iter().enumerate() {
        for (j, x) in row.iter().enumerate().skip(i + 1) {
            if x.abs() > best.2 {
                best = (i, j, x.abs());
            }
        }
    }
    best
}

/// Apply `A ← Jᵀ·A·J` and `V ← V·J` for the rotation in the (p, q) plane
fn rotate(a: &mut [Vec<f64>], v: &mut [Vec<f64>], p: usize, q: usize, theta: f64) {
    let (s, c) = theta.sin_cos();
    let n = a.len();

    for k in 0..n {
        let (akp, akq) = (a[k][p], a[k][q]);
        a[k][p] = c * akp + s * akq;
        a[k][q] = -s * akp + c * akq;
    }
    for k in 0..n {
        let (apk, aqk) = (a[p][k], a[q][k]);
        a[p][k] = c * apk + s * aqk;
        a[q][k] = -s * apk + c * aqk;
    }
    a[p][q] = 0.0;
    a[q][p] = 0.0;

    for row in v.iter_mut() {
        let (vp, vq) = (row[p], row[q]);
        row[p] = c * vp + s * vq;
        row[q] = -s * vp + c * vq;
    }
}
