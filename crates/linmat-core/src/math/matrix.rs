use std::cell::Cell;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::config::NumericConfig;
use crate::error::{MatrixError, Result};
use crate::math::vector::{dot_f64, Vector};

/// Aggregates recomputed every time the content changes.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Stats {
    min: f64,
    max: f64,
    norm: f64,
}

impl Stats {
    fn of(data: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut scale: f64 = 0.0;
        for &v in data {
            min = min.min(v);
            max = max.max(v);
            scale = scale.max(v.abs());
        }
        // sum of squares relative to the largest magnitude, so huge finite
        // entries do not overflow
        let norm = if scale == 0.0 {
            0.0
        } else {
            let sum_sq: f64 = data.iter().map(|v| (v / scale) * (v / scale)).sum();
            scale * sum_sq.sqrt()
        };
        Stats { min, max, norm }
    }
}

/// Dense, row-major matrix of finite doubles.
///
/// Shape and aggregates (min, max, euclidean norm) are fixed at every commit
/// of new content. The determinant is computed on demand and cached until the
/// next content change. All content changes go through the same validation
/// path, and a failed operation leaves the matrix untouched.
///
/// The determinant cache lives in a `Cell`, so a `Matrix` is `Send` but not
/// `Sync`: share it across threads by cloning, not by reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "MatrixRecord", into = "MatrixRecord")]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    stats: Option<Stats>,
    epsilon: f64,
    det: Cell<Option<f64>>,
}

impl Matrix {
    /// An unpopulated matrix; most operations on it fail with `Empty`.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
            stats: None,
            epsilon: NumericConfig::DEFAULT_ZERO_THRESHOLD,
            det: Cell::new(None),
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let mut m = Matrix::new();
        m.set_data(rows)?;
        Ok(m)
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<f64>) -> Result<Self> {
        let mut m = Matrix::new();
        m.commit(shape.0, shape.1, data)?;
        Ok(m)
    }

    /// Replace the whole content, possibly with a different shape.
    pub fn set_data(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(MatrixError::invalid_shape(format!(
                    "row {} has {} entries, expecting {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            data.extend_from_slice(row);
        }
        self.commit(rows.len(), ncols, data)
    }

    /// Validate and install a new row-major buffer. Nothing is modified on error.
    pub(crate) fn commit(&mut self, rows: usize, cols: usize, data: Vec<f64>) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::invalid_shape(format!(
                "cannot create a {}x{} matrix",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(MatrixError::invalid_shape(format!(
                "shape ({}, {}) does not match buffer of length {}",
                rows,
                cols,
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(MatrixError::invalid_shape(format!(
                "entry ({}, {}) is not a finite number",
                pos / cols,
                pos % cols
            )));
        }
        self.stats = Some(Stats::of(&data));
        self.data = data;
        self.rows = rows;
        self.cols = cols;
        self.det.set(None);
        Ok(())
    }

    /// Recompute aggregates after an in-place edit of an already validated buffer.
    fn refresh(&mut self) {
        self.stats = Some(Stats::of(&self.data));
        self.det.set(None);
    }

    pub fn with_config(mut self, config: &NumericConfig) -> Result<Self> {
        self.apply_config(config)?;
        Ok(self)
    }

    pub fn apply_config(&mut self, config: &NumericConfig) -> Result<()> {
        self.set_zero_threshold(config.zero_threshold)
    }

    pub fn zero_threshold(&self) -> f64 {
        self.epsilon
    }

    pub fn set_zero_threshold(&mut self, epsilon: f64) -> Result<()> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(MatrixError::InvalidValue { value: epsilon });
        }
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_none()
    }

    pub(crate) fn ensure_populated(&self) -> Result<()> {
        if self.is_empty() {
            return Err(MatrixError::Empty);
        }
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn size(&self) -> Result<(usize, usize)> {
        self.ensure_populated()?;
        Ok((self.rows, self.cols))
    }

    pub fn is_square(&self) -> Result<bool> {
        self.ensure_populated()?;
        Ok(self.rows == self.cols)
    }

    pub(crate) fn ensure_square(&self, operation: &'static str) -> Result<usize> {
        if !self.is_square()? {
            return Err(MatrixError::NotSquare {
                operation,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.rows)
    }

    fn stats(&self) -> Result<Stats> {
        self.stats.ok_or(MatrixError::Empty)
    }

    pub fn min(&self) -> Result<f64> {
        Ok(self.stats()?.min)
    }

    pub fn max(&self) -> Result<f64> {
        Ok(self.stats()?.max)
    }

    /// Euclidean norm, `sqrt(sum(e[i][j]^2))`.
    pub fn norm(&self) -> Result<f64> {
        Ok(self.stats()?.norm)
    }

    pub(crate) fn cached_determinant(&self) -> Option<f64> {
        self.det.get()
    }

    pub(crate) fn cache_determinant(&self, det: f64) {
        self.det.set(Some(det));
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Content as an array of rows.
    pub fn data(&self) -> Result<Vec<Vec<f64>>> {
        self.ensure_populated()?;
        Ok(self.data.chunks(self.cols).map(|r| r.to_vec()).collect())
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        self.ensure_populated()?;
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub(crate) fn row_slice(&self, row: usize) -> &[f64] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn element(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.data[self.offset(row, col)])
    }

    pub fn set_element(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        if !value.is_finite() {
            return Err(MatrixError::InvalidValue { value });
        }
        let offset = self.offset(row, col);
        self.data[offset] = value;
        self.refresh();
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<Vec<f64>> {
        self.check_index(row, 0)?;
        Ok(self.row_slice(row).to_vec())
    }

    pub fn row_vector(&self, row: usize) -> Result<Vector> {
        self.row(row).map(Vector::from_vec)
    }

    pub fn col(&self, col: usize) -> Result<Vec<f64>> {
        self.check_index(0, col)?;
        Ok((0..self.rows).map(|r| self.data[self.offset(r, col)]).collect())
    }

    pub fn col_vector(&self, col: usize) -> Result<Vector> {
        self.col(col).map(Vector::from_vec)
    }

    fn check_values(values: &[f64]) -> Result<()> {
        match values.iter().find(|v| !v.is_finite()) {
            Some(&value) => Err(MatrixError::InvalidValue { value }),
            None => Ok(()),
        }
    }

    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        self.check_index(row, 0)?;
        if values.len() != self.cols {
            return Err(MatrixError::DimensionMismatch {
                operation: "set_row",
                lhs: (1, self.cols),
                rhs: (1, values.len()),
            });
        }
        Self::check_values(values)?;
        let start = self.offset(row, 0);
        self.data[start..start + self.cols].copy_from_slice(values);
        self.refresh();
        Ok(())
    }

    pub fn set_col(&mut self, col: usize, values: &[f64]) -> Result<()> {
        self.check_index(0, col)?;
        if values.len() != self.rows {
            return Err(MatrixError::DimensionMismatch {
                operation: "set_col",
                lhs: (self.rows, 1),
                rhs: (values.len(), 1),
            });
        }
        Self::check_values(values)?;
        for (r, &v) in values.iter().enumerate() {
            let offset = self.offset(r, col);
            self.data[offset] = v;
        }
        self.refresh();
        Ok(())
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        let r1 = self.row(i)?;
        let r2 = self.row(j)?;
        self.set_row(j, &r1)?;
        self.set_row(i, &r2)
    }

    pub fn swap_cols(&mut self, i: usize, j: usize) -> Result<()> {
        let c1 = self.col(i)?;
        let c2 = self.col(j)?;
        self.set_col(j, &c1)?;
        self.set_col(i, &c2)
    }

    /// Exchange the content of row `row` with that of column `col`.
    ///
    /// The column is written first and the row last, so the shared element
    /// `(row, col)` ends up holding the old diagonal value `(col, col)`.
    pub fn swap_row_col(&mut self, row: usize, col: usize) -> Result<()> {
        self.ensure_square("swap_row_col")?;
        let c = self.col(col)?;
        let r = self.row(row)?;
        self.set_col(col, &r)?;
        self.set_row(row, &c)
    }

    /// Position of the first element (row-major) equal to `value`.
    pub fn value_index(&self, value: f64) -> Result<Option<(usize, usize)>> {
        self.ensure_populated()?;
        Ok(self
            .data
            .iter()
            .position(|&v| v == value)
            .map(|pos| (pos / self.cols, pos % self.cols)))
    }

    pub fn min_index(&self) -> Result<Option<(usize, usize)>> {
        self.value_index(self.min()?)
    }

    pub fn max_index(&self) -> Result<Option<(usize, usize)>> {
        self.value_index(self.max()?)
    }

    /// Replace the content with its transpose; valid for any shape.
    pub fn transpose(&mut self) -> Result<()> {
        self.ensure_populated()?;
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[self.offset(r, c)]);
            }
        }
        self.commit(self.cols, self.rows, data)
    }

    pub fn trace(&self) -> Result<f64> {
        let n = self.ensure_square("trace")?;
        Ok((0..n).map(|i| self.data[self.offset(i, i)]).sum())
    }

    pub fn diagonal(&self) -> Result<Vector> {
        let n = self.ensure_square("diagonal")?;
        Ok((0..n).map(|i| self.data[self.offset(i, i)]).collect())
    }

    /// Copy of the `nrows x ncols` block whose top-left corner is `(row, col)`.
    pub fn sub_matrix(&self, row: usize, col: usize, nrows: usize, ncols: usize) -> Result<Matrix> {
        self.ensure_populated()?;
        if row + nrows > self.rows || col + ncols > self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row: row + nrows.saturating_sub(1),
                col: col + ncols.saturating_sub(1),
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut data = Vec::with_capacity(nrows * ncols);
        for r in row..row + nrows {
            data.extend_from_slice(&self.row_slice(r)[col..col + ncols]);
        }
        let mut sub = Matrix::from_shape_vec((nrows, ncols), data)?;
        sub.epsilon = self.epsilon;
        Ok(sub)
    }

    fn check_same_shape(&self, other: &Matrix, operation: &'static str) -> Result<()> {
        let lhs = self.size()?;
        let rhs = other.size()?;
        if lhs != rhs {
            return Err(MatrixError::DimensionMismatch { operation, lhs, rhs });
        }
        Ok(())
    }

    pub fn add(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape(other, "add")?;
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect();
        self.commit(self.rows, self.cols, data)
    }

    pub fn sub(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape(other, "sub")?;
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect();
        self.commit(self.rows, self.cols, data)
    }

    pub fn scale(&mut self, factor: f64) -> Result<()> {
        self.ensure_populated()?;
        if !factor.is_finite() {
            return Err(MatrixError::InvalidValue { value: factor });
        }
        let data = self.data.iter().map(|v| v * factor).collect();
        self.commit(self.rows, self.cols, data)
    }

    pub fn scale_row(&mut self, row: usize, factor: f64) -> Result<()> {
        if !factor.is_finite() {
            return Err(MatrixError::InvalidValue { value: factor });
        }
        let scaled: Vec<f64> = self.row(row)?.iter().map(|v| v * factor).collect();
        self.set_row(row, &scaled)
    }

    /// `self := self * other`. Entries at or below the zero threshold in
    /// magnitude are snapped to exactly zero.
    pub fn multiply(&mut self, other: &Matrix) -> Result<()> {
        let (nr, nc) = self.size()?;
        let (onr, onc) = other.size()?;
        if nc != onr {
            return Err(MatrixError::DimensionMismatch {
                operation: "multiply",
                lhs: (nr, nc),
                rhs: (onr, onc),
            });
        }
        let mut data = Vec::with_capacity(nr * onc);
        for i in 0..nr {
            let lhs = self.row_slice(i);
            for j in 0..onc {
                let mut total = 0.0;
                for (k, a) in lhs.iter().enumerate() {
                    total += a * other.data[other.offset(k, j)];
                }
                if total.abs() <= self.epsilon {
                    total = 0.0;
                }
                data.push(total);
            }
        }
        self.commit(nr, onc, data)
    }

    pub fn vector_multiply(&self, v: &Vector) -> Result<Vector> {
        let (nr, nc) = self.size()?;
        if nc != v.len() {
            return Err(MatrixError::DimensionMismatch {
                operation: "vector_multiply",
                lhs: (nr, nc),
                rhs: (v.len(), 1),
            });
        }
        Ok((0..nr)
            .map(|i| dot_f64(self.row_slice(i), v.as_slice()))
            .collect())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::new()
    }
}

/// Equality of shape and content; caches and the zero threshold are ignored.
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        assert!(
            index.0 < self.rows && index.1 < self.cols,
            "matrix index out of bounds"
        );
        &self.data[self.offset(index.0, index.1)]
    }
}

/// On-disk form of a matrix: rows plus its zero threshold.
#[derive(Serialize, Deserialize)]
struct MatrixRecord {
    rows: Vec<Vec<f64>>,
    #[serde(default = "default_zero_threshold")]
    zero_threshold: f64,
}

fn default_zero_threshold() -> f64 {
    NumericConfig::DEFAULT_ZERO_THRESHOLD
}

impl TryFrom<MatrixRecord> for Matrix {
    type Error = MatrixError;

    fn try_from(record: MatrixRecord) -> Result<Self> {
        let mut m = Matrix::from_rows(&record.rows)?;
        m.set_zero_threshold(record.zero_threshold)?;
        Ok(m)
    }
}

impl From<Matrix> for MatrixRecord {
    fn from(m: Matrix) -> Self {
        MatrixRecord {
            rows: m.data().unwrap_or_default(),
            zero_threshold: m.epsilon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_track_content() {
        let mut m = Matrix::from_rows(&[vec![1.0, -2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.min().unwrap(), -2.0);
        m.set_element(0, 1, 10.0).unwrap();
        assert_eq!(m.min().unwrap(), 1.0);
        assert_eq!(m.max().unwrap(), 10.0);
    }

    #[test]
    fn failed_commit_leaves_content() {
        let mut m = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let err = m.commit(1, 2, vec![1.0, f64::NAN]);
        assert!(matches!(err, Err(MatrixError::InvalidShape { .. })));
        assert_eq!(m.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn content_change_clears_determinant_cache() {
        let mut m = Matrix::from_rows(&[vec![1.0]]).unwrap();
        m.cache_determinant(1.0);
        m.scale(2.0).unwrap();
        assert_eq!(m.cached_determinant(), None);
    }

    #[test]
    fn matrix_moves_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<Matrix>();

        let m = Matrix::from_rows(&[vec![2.0, 0.0], vec![0.0, 3.0]]).unwrap();
        let copy = m.clone();
        let det = std::thread::spawn(move || copy.determinant().unwrap())
            .join()
            .unwrap();
        assert_eq!(det, 6.0);
        assert_eq!(m.cached_determinant(), None);
    }
}
