//! Pivoted Gaussian elimination (determinant) and Gauss-Jordan inversion.
//!
//! Both algorithms run on a private copy of the matrix content. At every pivot
//! step the running determinant is normalized by the euclidean norm of the
//! *original* matrix and compared with its zero threshold; falling below it is
//! reported as an ill-conditioned matrix. The caller's matrix is only written
//! once inversion has fully succeeded.
use log::trace;

use crate::error::{MatrixError, Result};
use crate::math::Matrix;

/// Square row-major scratch buffer used during elimination.
#[derive(Clone, Debug)]
struct Workspace {
    data: Vec<f64>,
    n: usize,
}

impl Workspace {
    fn from_matrix(m: &Matrix) -> Self {
        Self {
            data: m.as_slice().to_vec(),
            n: m.nrows(),
        }
    }

    fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { data, n }
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.n {
            self.data.swap(a * self.n + col, b * self.n + col);
        }
    }

    fn scale_row(&mut self, row: usize, factor: f64) {
        for v in &mut self.data[row * self.n..(row + 1) * self.n] {
            *v *= factor;
        }
    }

    /// Row in `col..n` holding the largest magnitude in column `col`.
    ///
    /// Only a strictly greater magnitude moves the choice, so ties keep the
    /// lowest row; an all-zero column yields `col` itself.
    fn pivot_row(&self, col: usize) -> usize {
        let mut max = 0.0;
        let mut idx = col;
        for row in col..self.n {
            let val = self.get(row, col).abs();
            if val > max {
                max = val;
                idx = row;
            }
        }
        idx
    }
}

/// Running product of pivots, checked at every step.
struct PivotTracker {
    det: f64,
    negative: bool,
    norm: f64,
    epsilon: f64,
}

impl PivotTracker {
    fn new(original: &Matrix) -> Result<Self> {
        Ok(Self {
            det: 1.0,
            negative: false,
            norm: original.norm()?,
            epsilon: original.zero_threshold(),
        })
    }

    fn flip(&mut self) {
        self.negative = !self.negative;
    }

    fn accept(&mut self, step: usize, pivot: f64) -> Result<()> {
        if pivot == 0.0 {
            return Err(MatrixError::SingularMatrix { step });
        }
        self.det *= pivot;
        let normalized = self.det.abs() / self.norm;
        trace!(
            "pivot step {}: pivot = {}, normalized determinant = {}",
            step,
            pivot,
            normalized
        );
        if normalized < self.epsilon {
            return Err(MatrixError::IllConditioned { step, normalized });
        }
        Ok(())
    }

    fn determinant(&self) -> f64 {
        if self.negative {
            -self.det
        } else {
            self.det
        }
    }
}

impl Matrix {
    /// Determinant by Gaussian elimination with partial pivoting.
    ///
    /// The value is cached and returned directly by later calls until the
    /// content changes.
    pub fn determinant(&self) -> Result<f64> {
        if let Some(det) = self.cached_determinant() {
            return Ok(det);
        }
        let n = self.ensure_square("determinant")?;
        let mut tracker = PivotTracker::new(self)?;
        let mut m = Workspace::from_matrix(self);

        for r in 0..n {
            let ridx = m.pivot_row(r);
            if ridx != r {
                m.swap_rows(r, ridx);
                tracker.flip();
            }
            let pivot = m.get(r, r);
            tracker.accept(r, pivot)?;

            for i in r + 1..n {
                let factor = m.get(i, r) / pivot;
                for j in r..n {
                    let val = m.get(i, j) - factor * m.get(r, j);
                    m.set(i, j, val);
                }
            }
        }

        let det = tracker.determinant();
        self.cache_determinant(det);
        Ok(det)
    }

    /// `|det| / norm`.
    pub fn normalized_determinant(&self) -> Result<f64> {
        let det = self.determinant()?;
        let norm = self.norm()?;
        if norm == 0.0 {
            return Err(MatrixError::UndefinedNorm);
        }
        Ok((det / norm).abs())
    }

    /// Invert in place by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Returns the determinant of the matrix as it was before inversion. On
    /// success the determinant cache describes the inverse, so a following
    /// `determinant()` call returns `1 / det`, not the value returned here.
    pub fn invert(&mut self) -> Result<f64> {
        let n = self.ensure_square("invert")?;
        let mut tracker = PivotTracker::new(self)?;
        let mut m = Workspace::from_matrix(self);
        let mut q = Workspace::identity(n);

        for i in 0..n {
            let ridx = m.pivot_row(i);
            if ridx != i {
                m.swap_rows(i, ridx);
                q.swap_rows(i, ridx);
                tracker.flip();
            }
            let pivot = m.get(i, i);
            tracker.accept(i, pivot)?;

            m.scale_row(i, 1.0 / pivot);
            q.scale_row(i, 1.0 / pivot);

            for j in 0..n {
                if j == i {
                    continue;
                }
                let factor = m.get(j, i);
                for k in 0..n {
                    let vm = m.get(j, k) - factor * m.get(i, k);
                    let vq = q.get(j, k) - factor * q.get(i, k);
                    m.set(j, k, vm);
                    q.set(j, k, vq);
                }
            }
        }

        let det = tracker.determinant();
        self.commit(n, n, q.data)?;
        self.cache_determinant(1.0 / det);
        Ok(det)
    }

    /// Inverse as a new matrix; `self` is left untouched.
    pub fn inverse(&self) -> Result<Matrix> {
        let mut inv = self.clone();
        inv.invert()?;
        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_row_of_zero_column_is_diagonal() {
        let m = Matrix::from_rows(&[vec![0.0, 1.0], vec![0.0, 2.0]]).unwrap();
        let ws = Workspace::from_matrix(&m);
        assert_eq!(ws.pivot_row(0), 0);
    }

    #[test]
    fn tie_break_prefers_lower_row() {
        let ws = Workspace {
            data: vec![2.0, 0.0, 0.0, -2.0, 1.0, 0.0, 2.0, 0.0, 1.0],
            n: 3,
        };
        assert_eq!(ws.pivot_row(0), 0);
    }
}
