//! Conversions between the crate types and `ndarray` containers.
use ndarray::{Array1, Array2};

use crate::error::{MatrixError, Result};
use crate::math::{Matrix, Vector};

impl TryFrom<&Array2<f64>> for Matrix {
    type Error = MatrixError;

    fn try_from(array: &Array2<f64>) -> Result<Self> {
        let (rows, cols) = array.dim();
        Matrix::from_shape_vec((rows, cols), array.iter().copied().collect())
    }
}

impl Matrix {
    pub fn to_ndarray(&self) -> Result<Array2<f64>> {
        let shape = self.size()?;
        Array2::from_shape_vec(shape, self.as_slice().to_vec())
            .map_err(|e| MatrixError::invalid_shape(e.to_string()))
    }
}

impl From<&Array1<f64>> for Vector {
    fn from(array: &Array1<f64>) -> Self {
        array.iter().copied().collect()
    }
}

impl From<&Vector> for Array1<f64> {
    fn from(v: &Vector) -> Self {
        Array1::from_vec(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_round_trips_through_ndarray() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let a = m.to_ndarray().unwrap();
        assert_eq!(a[[1, 0]], 4.0);
        assert_eq!(Matrix::try_from(&a).unwrap(), m);
    }
}
