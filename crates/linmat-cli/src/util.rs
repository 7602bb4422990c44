use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use linmat_core::io::{read_matrix, write_matrix, MatrixFormat};
use linmat_core::{Matrix, Vector};

use crate::config::CliConfig;

/// The explicit `--format` if given, else the format implied by the extension.
pub fn resolve_format(path: &Path, explicit: Option<&str>) -> Result<MatrixFormat> {
    match explicit {
        Some(name) => name
            .parse::<MatrixFormat>()
            .with_context(|| format!("Unsupported --format value: {}", name)),
        None => Ok(MatrixFormat::from_path(path)),
    }
}

/// Output format for `-o`: `.csv`/`.json` pick their format, anything else
/// falls back to the configured default.
pub fn output_format(path: &Path, config: &CliConfig) -> MatrixFormat {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("csv") => MatrixFormat::Csv,
        Some("json") => MatrixFormat::Serialized,
        _ => config.output_format,
    }
}

/// Read a matrix and apply the configured numeric settings to it.
pub fn load_matrix(path: &PathBuf, format: Option<&str>, config: &CliConfig) -> Result<Matrix> {
    let format = resolve_format(path, format)?;
    let mut matrix = read_matrix(path, format)
        .with_context(|| format!("Failed to load matrix: {}", path.display()))?;
    matrix.apply_config(&config.numeric)?;
    log::debug!(
        "[linmat] Loaded {}x{} matrix from {:?}",
        matrix.nrows(),
        matrix.ncols(),
        path
    );
    Ok(matrix)
}

/// Read a right-hand side stored as a single-row or single-column matrix.
pub fn load_vector(path: &PathBuf, format: Option<&str>, config: &CliConfig) -> Result<Vector> {
    let m = load_matrix(path, format, config)?;
    match m.size()? {
        (1, _) => Ok(m.row_vector(0)?),
        (_, 1) => Ok(m.col_vector(0)?),
        (rows, cols) => anyhow::bail!(
            "Right-hand side must be a single row or column, found {}x{}: {}",
            rows,
            cols,
            path.display()
        ),
    }
}

/// Write `matrix` to `path`, or render it for stdout when no path is given.
pub fn emit_matrix(matrix: &Matrix, output: Option<&PathBuf>, config: &CliConfig) -> Result<String> {
    match output {
        Some(path) => {
            let format = output_format(path, config);
            write_matrix(matrix, path, format)
                .with_context(|| format!("Failed to write matrix: {}", path.display()))?;
            log::info!("[linmat] Wrote {} matrix to {:?}", format, path);
            Ok(String::new())
        }
        None => Ok(matrix.to_display_string(&config.number_format()?)?),
    }
}
