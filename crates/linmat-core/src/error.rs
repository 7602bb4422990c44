use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by matrix construction, elimination, solving and persistence.
///
/// Every failing operation leaves the target matrix exactly as it was before
/// the call.
#[derive(Error, Debug)]
pub enum MatrixError {
    /// Ragged, missing or non-finite source data.
    #[error("invalid matrix data: {reason}")]
    InvalidShape { reason: String },

    /// The matrix has not been populated.
    #[error("matrix has not been populated")]
    Empty,

    #[error("index ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A scalar that must be a finite number was not.
    #[error("invalid value {value}: expecting a finite number")]
    InvalidValue { value: f64 },

    #[error("{operation} is undefined for a non-square {rows}x{cols} matrix")]
    NotSquare {
        operation: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("incompatible dimensions for {operation}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        operation: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// A zero pivot survived partial pivoting.
    #[error("cannot continue, pivoting element at step {step} is zero")]
    SingularMatrix { step: usize },

    /// The running normalized determinant dropped below the zero threshold.
    #[error("probable singular or ill-conditioned matrix at step {step}, normalized determinant = {normalized}")]
    IllConditioned { step: usize, normalized: f64 },

    #[error("undefined normalized determinant, euclidean norm is zero")]
    UndefinedNorm,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed matrix file {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// A well-formed serialized object that is not a matrix.
    #[error("{} did not contain a matrix object (found {found})", path.display())]
    TypeMismatch { path: PathBuf, found: String },
}

pub type Result<T> = std::result::Result<T, MatrixError>;

impl MatrixError {
    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        MatrixError::InvalidShape {
            reason: reason.into(),
        }
    }
}
