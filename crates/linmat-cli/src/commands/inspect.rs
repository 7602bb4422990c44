//! `info`, `det` and `show`.
use anyhow::{Context, Result};

use linmat_core::report::NumberFormat;
use linmat_core::Matrix;

use crate::config::CliConfig;

fn general(precision: usize) -> Result<NumberFormat> {
    Ok(format!("%.{}g", precision).parse::<NumberFormat>()?)
}

/// Shape and aggregates; square matrices also report trace and determinant.
pub fn run_info(matrix: &Matrix) -> Result<String> {
    let g = general(6)?;
    let (rows, cols) = matrix.size()?;
    let mut lines = vec![
        format!("shape: {}x{}", rows, cols),
        format!("min: {}", g.format(matrix.min()?)),
        format!("max: {}", g.format(matrix.max()?)),
        format!("norm: {}", g.format(matrix.norm()?)),
    ];
    if matrix.is_square()? {
        lines.push(format!("trace: {}", g.format(matrix.trace()?)));
        match matrix.determinant() {
            Ok(det) => {
                lines.push(format!("determinant: {}", g.format(det)));
                let normalized = matrix.normalized_determinant()?;
                lines.push(format!("normalized determinant: {}", g.format(normalized)));
            }
            Err(e) => {
                log::warn!("[linmat] Determinant unavailable: {}", e);
                lines.push(format!("determinant: undefined ({})", e));
            }
        }
    }
    lines.push(String::new());
    Ok(lines.join("\n"))
}

pub fn run_det(matrix: &Matrix) -> Result<String> {
    let det = matrix
        .determinant()
        .context("Failed to compute the determinant")?;
    Ok(format!("{}\n", general(12)?.format(det)))
}

/// Text rendering with `fmt` (or the configured format), or an HTML table.
pub fn run_show(matrix: &Matrix, fmt: Option<&str>, html: bool, config: &CliConfig) -> Result<String> {
    if html {
        return Ok(matrix.to_html()? + "\n");
    }
    let format = match fmt {
        Some(spec) => spec
            .parse::<NumberFormat>()
            .with_context(|| format!("Invalid --fmt value: {}", spec))?,
        None => config.number_format()?,
    };
    Ok(matrix.to_display_string(&format)?)
}
