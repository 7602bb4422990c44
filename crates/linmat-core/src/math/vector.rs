use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;
use std::slice::Iter;

use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};

/// Ordered sequence of doubles used as right-hand side and solution of `Ax = b`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self::new(data)
    }

    pub fn from_elem(len: usize, value: f64) -> Self {
        Vector::from_vec(vec![value; len])
    }

    pub fn zeros(len: usize) -> Self {
        Vector::from_elem(len, 0.0)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bounds-checked element access.
    pub fn get(&self, index: usize) -> Result<f64> {
        self.data
            .get(index)
            .copied()
            .ok_or(MatrixError::IndexOutOfRange {
                row: index,
                col: 0,
                rows: self.len(),
                cols: 1,
            })
    }

    pub fn iter(&self) -> Iter<'_, f64> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other, "vector addition")?;
        Ok(self.iter().zip(other.iter()).map(|(a, b)| a + b).collect())
    }

    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other, "vector subtraction")?;
        Ok(self.iter().zip(other.iter()).map(|(a, b)| a - b).collect())
    }

    pub fn scale(&self, factor: f64) -> Vector {
        self.iter().map(|v| v * factor).collect()
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_len(other, "dot product")?;
        Ok(dot_f64(self.as_slice(), other.as_slice()))
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        dot_f64(self.as_slice(), self.as_slice()).sqrt()
    }

    fn check_len(&self, other: &Vector, operation: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(MatrixError::DimensionMismatch {
                operation,
                lhs: (self.len(), 1),
                rhs: (other.len(), 1),
            });
        }
        Ok(())
    }
}

pub(crate) fn dot_f64(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter().zip(rhs.iter()).map(|(a, b)| a * b).sum()
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Vector::from_vec(value)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(value: Vector) -> Self {
        value.data
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.data.iter().enumerate() {
            write!(f, "{}", value)?;
            if idx + 1 != self.data.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
