use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which group of features a vector was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for VectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorKind::Numeric => write!(f, "numeric"),
            VectorKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Errors raised by the analysis core.
///
/// None of these are transient: they signal malformed input or caller misuse
/// and are returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Value vector is missing for object {0}")]
    VectorNull(u64),

    #[error("{kind} vector length mismatch: {left} vs {right}")]
    VectorLengthMismatch {
        kind: VectorKind,
        left: usize,
        right: usize,
    },

    #[error("Both objects have no comparable features")]
    EmptyVector,

    #[error("Not enough objects: {requested} clusters requested, {available} objects available")]
    InsufficientObjects { requested: usize, available: usize },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("Normalization error: {0}")]
    Normalization(String),
}
