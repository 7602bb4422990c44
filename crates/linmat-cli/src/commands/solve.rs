use anyhow::{Context, Result};

use linmat_core::solver::{solve, solve_ec_with_config};
use linmat_core::{Matrix, Vector};

use crate::config::CliConfig;

/// Solve `Ax = b` and render `x` as a single row.
pub fn run_solve(a: &Matrix, b: &Vector, refine: bool, config: &CliConfig) -> Result<String> {
    let x = if refine {
        let refined = solve_ec_with_config(a, b, &config.numeric)
            .context("Failed to solve the linear system")?;
        log::info!(
            "[linmat] Refined solution in {} pass(es), remaining correction norm = {:e}",
            refined.iterations,
            refined.adjustment_norm
        );
        refined.x
    } else {
        solve(a, b).context("Failed to solve the linear system")?
    };
    let row = Matrix::from_shape_vec((1, x.len()), x.to_vec())?;
    Ok(row.to_display_string(&config.number_format()?)?)
}
