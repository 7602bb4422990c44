use std::path::PathBuf;

use anyhow::{Context, Result};

use linmat_core::Matrix;

use crate::config::CliConfig;
use crate::util::emit_matrix;

/// Invert `matrix` in place and write or render the inverse.
pub fn run_invert(
    matrix: &mut Matrix,
    output: Option<&PathBuf>,
    config: &CliConfig,
) -> Result<String> {
    let det = matrix.invert().context("Failed to invert the matrix")?;
    log::info!(
        "[linmat] Inverted {}x{} matrix, determinant = {}",
        matrix.nrows(),
        matrix.ncols(),
        det
    );
    emit_matrix(matrix, output, config)
}
