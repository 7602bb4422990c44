//! Solving `Ax = b` through the inverse of `A`, with optional iterative
//! error correction.
use log::{debug, warn};

use crate::config::NumericConfig;
use crate::error::{MatrixError, Result};
use crate::math::{Matrix, Vector};

/// Outcome of [`solve_ec_with_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// Last accepted solution.
    pub x: Vector,
    /// Number of correction passes that improved the solution.
    pub iterations: usize,
    /// Norm of the correction that would be applied next.
    pub adjustment_norm: f64,
}

fn check_rhs(a: &Matrix, b: &Vector) -> Result<()> {
    let (rows, cols) = a.size()?;
    if cols != b.len() {
        return Err(MatrixError::DimensionMismatch {
            operation: "solve",
            lhs: (rows, cols),
            rhs: (b.len(), 1),
        });
    }
    Ok(())
}

/// Solve `Ax = b` as `x = inv(A) * b`, leaving `a` untouched.
pub fn solve(a: &Matrix, b: &Vector) -> Result<Vector> {
    check_rhs(a, b)?;
    let ainv = a.inverse()?;
    ainv.vector_multiply(b)
}

/// Solve `Ax = b`, inverting `a` in place. On success `a` holds `inv(A)`.
pub fn solve_in_place(a: &mut Matrix, b: &Vector) -> Result<Vector> {
    check_rhs(a, b)?;
    a.invert()?;
    a.vector_multiply(b)
}

/// Solve `Ax = b` with iterative error correction, using the default
/// refinement cap.
pub fn solve_ec(a: &Matrix, b: &Vector) -> Result<Vector> {
    solve_ec_with_config(a, b, &NumericConfig::default()).map(|r| r.x)
}

/// Solve `Ax = b` and refine the solution from its residual.
///
/// With `xp` an approximate solution and `bp = A * xp`, the correction
/// `adj = inv(A) * (b - bp)` satisfies `A * adj = b - bp`. Corrections are
/// applied while they keep shrinking, at most `config.max_refinements` times;
/// the first correction that does not shrink ends the loop.
pub fn solve_ec_with_config(a: &Matrix, b: &Vector, config: &NumericConfig) -> Result<Refinement> {
    check_rhs(a, b)?;
    let ainv = a.inverse()?;

    let mut x = ainv.vector_multiply(b)?;
    let mut adj = correction(a, &ainv, b, &x)?;
    let mut adj_norm = adj.length();
    debug!("initial solution correction norm = {}", adj_norm);

    let mut iterations = 0;
    for pass in 0..config.max_refinements {
        let x_new = x.add(&adj)?;
        let new_adj = correction(a, &ainv, b, &x_new)?;
        let new_adj_norm = new_adj.length();
        if new_adj_norm < adj_norm {
            debug!(
                "refinement pass {}: correction norm {} -> {}",
                pass, adj_norm, new_adj_norm
            );
            x = x_new;
            adj = new_adj;
            adj_norm = new_adj_norm;
            iterations += 1;
        } else {
            debug!(
                "refinement pass {}: correction norm {} did not improve on {}, stopping",
                pass, new_adj_norm, adj_norm
            );
            break;
        }
    }
    if iterations == 0 && adj_norm > 0.0 {
        warn!(
            "error correction did not improve the direct solution (correction norm = {})",
            adj_norm
        );
    }

    Ok(Refinement {
        x,
        iterations,
        adjustment_norm: adj_norm,
    })
}

/// `inv(A) * (b - A * x)`.
fn correction(a: &Matrix, ainv: &Matrix, b: &Vector, x: &Vector) -> Result<Vector> {
    let b_prime = a.vector_multiply(x)?;
    let err = b.sub(&b_prime)?;
    ainv.vector_multiply(&err)
}

/// `A * B` as a new matrix.
pub fn multiply_matrices(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut product = a.clone();
    product.multiply(b)?;
    Ok(product)
}
