//! Generators for the standard matrices.
use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use linmat_core::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Identity,
    Hilbert,
    Zero,
    One,
}

impl MatrixKind {
    pub const NAMES: [&'static str; 4] = ["identity", "hilbert", "zero", "one"];
}

impl FromStr for MatrixKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" => Ok(MatrixKind::Identity),
            "hilbert" => Ok(MatrixKind::Hilbert),
            "zero" => Ok(MatrixKind::Zero),
            "one" => Ok(MatrixKind::One),
            _ => anyhow::bail!("Unknown matrix kind: {}", s),
        }
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixKind::Identity => "identity",
            MatrixKind::Hilbert => "hilbert",
            MatrixKind::Zero => "zero",
            MatrixKind::One => "one",
        };
        f.write_str(name)
    }
}

/// Build a `size x cols` matrix; identity and Hilbert matrices are square.
pub fn build_matrix(kind: MatrixKind, size: usize, cols: Option<usize>) -> Result<Matrix> {
    let cols = cols.unwrap_or(size);
    let matrix = match kind {
        MatrixKind::Identity | MatrixKind::Hilbert if cols != size => {
            anyhow::bail!("A {} matrix must be square, got {}x{}", kind, size, cols)
        }
        MatrixKind::Identity => Matrix::identity(size)?,
        MatrixKind::Hilbert => Matrix::hilbert(size)?,
        MatrixKind::Zero => Matrix::zero(size, cols)?,
        MatrixKind::One => Matrix::one(size, cols)?,
    };
    Ok(matrix)
}
