//! Configuration file for the `linmat` command line.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use linmat_core::io::MatrixFormat;
use linmat_core::report::NumberFormat;
use linmat_core::NumericConfig;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Zero threshold and refinement cap applied to every loaded matrix.
    pub numeric: NumericConfig,
    /// printf-style element format used when printing matrices and vectors.
    pub display_format: String,
    /// Format used for `-o` outputs without a recognised extension.
    pub output_format: MatrixFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            numeric: NumericConfig::default(),
            display_format: NumberFormat::DEFAULT_SPEC.to_string(),
            output_format: MatrixFormat::Csv,
        }
    }
}

impl CliConfig {
    /// The parsed `display_format`.
    pub fn number_format(&self) -> Result<NumberFormat> {
        self.display_format
            .parse::<NumberFormat>()
            .with_context(|| format!("Invalid display_format: {}", self.display_format))
    }
}

/// Load a CLI configuration from a JSON file.
pub fn load_cli_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: CliConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    config.number_format()?;
    Ok(config)
}
