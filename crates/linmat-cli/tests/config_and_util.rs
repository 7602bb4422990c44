//! Integration tests for CLI config parsing, file helpers and generators.

use std::path::{Path, PathBuf};

use linmat_cli::commands::inspect::{run_det, run_info, run_show};
use linmat_cli::commands::make::{build_matrix, MatrixKind};
use linmat_cli::config::{load_cli_config, CliConfig};
use linmat_cli::util::{emit_matrix, load_vector, output_format, resolve_format};
use linmat_core::io::MatrixFormat;
use linmat_core::{Matrix, NumericConfig};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// ---------------------------------------------------------------------------
// CliConfig
// ---------------------------------------------------------------------------

#[test]
fn cli_config_default_values() {
    let cfg = CliConfig::default();
    assert_eq!(cfg.numeric, NumericConfig::default());
    assert_eq!(cfg.display_format, "%6.2f");
    assert_eq!(cfg.output_format, MatrixFormat::Csv);
    assert!(cfg.number_format().is_ok());
}

#[test]
fn cli_config_serializes_to_json() {
    let json = serde_json::to_string_pretty(&CliConfig::default()).unwrap();
    assert!(json.contains("zero_threshold"));
    assert!(json.contains("max_refinements"));
    assert!(json.contains("\"output_format\": \"csv\""));
}

#[test]
fn load_partial_config_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "config.json",
        r#"{"numeric": {"max_refinements": 3}, "output_format": "serialized"}"#,
    );
    let cfg = load_cli_config(&path).unwrap();
    assert_eq!(cfg.numeric.max_refinements, 3);
    assert_eq!(cfg.numeric.zero_threshold, 1e-18);
    assert_eq!(cfg.output_format, MatrixFormat::Serialized);
    assert_eq!(cfg.display_format, "%6.2f");
}

#[test]
fn load_config_rejects_bad_display_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.json", r#"{"display_format": "6.2f"}"#);
    let err = load_cli_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid display_format"));
}

#[test]
fn load_missing_config_errors() {
    assert!(load_cli_config("/nonexistent/config.json").is_err());
}

// ---------------------------------------------------------------------------
// Formats and files
// ---------------------------------------------------------------------------

#[test]
fn resolve_format_prefers_explicit_value() {
    assert_eq!(
        resolve_format(Path::new("m.csv"), None).unwrap(),
        MatrixFormat::Csv
    );
    assert_eq!(
        resolve_format(Path::new("m.csv"), Some("serialized")).unwrap(),
        MatrixFormat::Serialized
    );
    assert!(resolve_format(Path::new("m.csv"), Some("xml")).is_err());
}

#[test]
fn output_format_falls_back_to_config() {
    let mut cfg = CliConfig::default();
    assert_eq!(output_format(Path::new("o.json"), &cfg), MatrixFormat::Serialized);
    assert_eq!(output_format(Path::new("o.dat"), &cfg), MatrixFormat::Csv);
    cfg.output_format = MatrixFormat::Serialized;
    assert_eq!(output_format(Path::new("o.csv"), &cfg), MatrixFormat::Csv);
    assert_eq!(output_format(Path::new("o.dat"), &cfg), MatrixFormat::Serialized);
}

#[test]
fn load_vector_accepts_row_or_column() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CliConfig::default();

    let row = write(dir.path(), "row.csv", "1,2,3\n");
    assert_eq!(load_vector(&row, None, &cfg).unwrap().to_vec(), vec![1.0, 2.0, 3.0]);

    let col = write(dir.path(), "col.csv", "4\n5\n");
    assert_eq!(load_vector(&col, None, &cfg).unwrap().to_vec(), vec![4.0, 5.0]);

    let square = write(dir.path(), "square.csv", "1,2\n3,4\n");
    assert!(load_vector(&square, None, &cfg).is_err());
}

#[test]
fn emit_matrix_writes_file_or_renders() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CliConfig::default();
    let m = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();

    assert_eq!(emit_matrix(&m, None, &cfg).unwrap(), "  1.00  2.00\n");

    let out = dir.path().join("m.csv");
    assert_eq!(emit_matrix(&m, Some(&out), &cfg).unwrap(), "");
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "1,2\n");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[test]
fn matrix_kind_parsing() {
    for name in MatrixKind::NAMES {
        let kind: MatrixKind = name.parse().unwrap();
        assert_eq!(kind.to_string(), name);
    }
    assert!("upper".parse::<MatrixKind>().is_err());
}

#[test]
fn build_matrix_shapes() {
    let m = build_matrix(MatrixKind::One, 2, Some(3)).unwrap();
    assert_eq!(m.size().unwrap(), (2, 3));
    let m = build_matrix(MatrixKind::Hilbert, 3, None).unwrap();
    assert_eq!(m.element(2, 2).unwrap(), 1.0 / 5.0);
    assert!(build_matrix(MatrixKind::Identity, 2, Some(3)).is_err());
    assert!(build_matrix(MatrixKind::Zero, 0, None).is_err());
}

#[test]
fn info_skips_determinant_for_rectangular() {
    let m = Matrix::one(2, 3).unwrap();
    let out = run_info(&m).unwrap();
    assert!(out.contains("shape: 2x3"));
    assert!(!out.contains("determinant"));
    assert!(run_det(&m).is_err());
}

#[test]
fn show_rejects_bad_format() {
    let m = Matrix::identity(2).unwrap();
    let cfg = CliConfig::default();
    assert!(run_show(&m, Some("%q"), false, &cfg).is_err());
    assert_eq!(
        run_show(&m, Some("%2d"), false, &cfg).unwrap(),
        " 1 0\n 0 1\n"
    );
}
