//! Constructors for common and "famous" matrices.
use crate::error::{MatrixError, Result};
use crate::math::matrix::Matrix;

impl Matrix {
    /// A `rows x cols` matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Matrix> {
        if !value.is_finite() {
            return Err(MatrixError::InvalidValue { value });
        }
        Matrix::from_shape_vec((rows, cols), vec![value; rows * cols])
    }

    pub fn zero(rows: usize, cols: usize) -> Result<Matrix> {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn one(rows: usize, cols: usize) -> Result<Matrix> {
        Matrix::filled(rows, cols, 1.0)
    }

    /// Square matrix with ones on the diagonal and zeros elsewhere.
    pub fn identity(size: usize) -> Result<Matrix> {
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            data[i * size + i] = 1.0;
        }
        Matrix::from_shape_vec((size, size), data)
    }

    /// Alias of [`Matrix::identity`].
    pub fn unit(size: usize) -> Result<Matrix> {
        Matrix::identity(size)
    }

    /// Hilbert matrix, `H[i][j] = 1 / (i + j + 1)` for 0-based indices.
    pub fn hilbert(size: usize) -> Result<Matrix> {
        let mut data = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                data.push(1.0 / (i + j + 1) as f64);
            }
        }
        Matrix::from_shape_vec((size, size), data)
    }

    /// Hankel matrix with first column `first_col` and last row `last_row`
    /// (defaults to `first_col`).
    ///
    /// The leading entry of the row is always replaced by the trailing entry of
    /// the column so both definitions agree on the shared corner.
    pub fn hankel(first_col: &[f64], last_row: Option<&[f64]>) -> Result<Matrix> {
        let c = first_col;
        let mut r = last_row.unwrap_or(first_col).to_vec();
        if c.is_empty() || r.is_empty() {
            return Err(MatrixError::invalid_shape(
                "hankel requires a non-empty first column and last row",
            ));
        }
        let nc = c.len();
        r[0] = c[nc - 1];

        let mut data = Vec::with_capacity(nc * r.len());
        for i in 0..nc {
            for j in 0..r.len() {
                let value = if i + j < nc { c[i + j] } else { r[i + j + 1 - nc] };
                data.push(value);
            }
        }
        Matrix::from_shape_vec((nc, r.len()), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hankel_square_from_column_only() {
        let h = Matrix::hankel(&[1.0, 2.0, 3.0], None).unwrap();
        assert_eq!(
            h.data().unwrap(),
            vec![
                vec![1.0, 2.0, 3.0],
                vec![2.0, 3.0, 2.0],
                vec![3.0, 2.0, 3.0],
            ]
        );
    }
}
