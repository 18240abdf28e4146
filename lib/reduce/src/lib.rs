//! # simlens Reduce
//!
//! Two-dimensional projection of normalized objects for plotting.
//!
//! - [`MatrixProcessor`] - column centering and sample covariance
//! - [`JacobiSolver`] - eigen-decomposition of the symmetric covariance matrix
//! - [`PcaReducer`] - projection onto the two strongest principal components
//!
//! ## Example
//!
//! ```rust
//! use simlens_core::{DataObject, ParameterState, ParameterValue};
//! use simlens_reduce::PcaReducer;
//!
//! let x = ParameterState::numeric(1, "x");
//! let y = ParameterState::numeric(2, "y");
//! let objects: Vec<DataObject> = (0..4)
//!     .map(|i| {
//!         let t = i as f64 / 4.0;
//!         DataObject::new(
//!             i,
//!             format!("o{}", i),
//!             vec![
//!                 ParameterValue::numeric(1, x.clone(), t),
//!                 ParameterValue::numeric(2, y.clone(), 1.0 - t),
//!             ],
//!         )
//!     })
//!     .collect();
//!
//! let result = PcaReducer::new().reduce_dimensions(&objects).unwrap();
//! assert_eq!(result.object_coordinates.len(), 4);
//! // all variance lies on the first component
//! assert!(result.object_coordinates.iter().all(|c| c.y.abs() < 1e-9));
//! ```

pub mod matrix;
pub mod eigen;
pub mod pca;

pub use matrix::MatrixProcessor;
pub use eigen::{EigenDecomposition, JacobiSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
pub use pca::{ObjectCoordinate, PcaReducer, ReductionResult};
