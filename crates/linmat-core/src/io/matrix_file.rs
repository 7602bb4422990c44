//! Matrix files: plain CSV and a serialized (JSON) object envelope.
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};
use crate::math::{Matrix, Vector};

/// On-disk representation of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixFormat {
    /// Self-describing serialized object (tagged JSON).
    #[default]
    Serialized,
    /// One comma-separated line per row; `#` lines and blank lines are ignored.
    Csv,
}

impl MatrixFormat {
    /// `.csv` files are read as CSV, anything else as a serialized object.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("csv") => MatrixFormat::Csv,
            _ => MatrixFormat::Serialized,
        }
    }
}

impl FromStr for MatrixFormat {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(MatrixFormat::Csv),
            "serialized" | "serialized-object" | "json" => Ok(MatrixFormat::Serialized),
            _ => Err(MatrixError::InvalidArgument(format!(
                "unknown matrix format '{}', expecting 'csv' or 'serialized'",
                s
            ))),
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixFormat::Serialized => write!(f, "serialized"),
            MatrixFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Tagged envelope written by the serialized format.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StoredObject {
    Matrix(Matrix),
    Vector(Vector),
}

impl StoredObject {
    fn kind(&self) -> &'static str {
        match self {
            StoredObject::Matrix(_) => "matrix",
            StoredObject::Vector(_) => "vector",
        }
    }
}

fn io_error<P: AsRef<Path>>(path: P, source: io::Error) -> MatrixError {
    MatrixError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    }
}

fn format_error<P: AsRef<Path>>(path: P, reason: impl Into<String>) -> MatrixError {
    MatrixError::Format {
        path: path.as_ref().to_path_buf(),
        reason: reason.into(),
    }
}

/// Read a matrix stored with [`write_matrix`] (or a hand-written CSV file).
pub fn read_matrix<P: AsRef<Path>>(path: P, format: MatrixFormat) -> Result<Matrix> {
    let path = path.as_ref();
    let meta = fs::metadata(path).map_err(|e| io_error(path, e))?;
    if meta.len() == 0 {
        return Err(io_error(
            path,
            io::Error::new(io::ErrorKind::UnexpectedEof, "file is empty"),
        ));
    }
    debug!("reading {} matrix from {}", format, path.display());

    match format {
        MatrixFormat::Csv => read_csv(path),
        MatrixFormat::Serialized => read_serialized(path),
    }
}

fn read_csv(path: &Path) -> Result<Matrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        let row = record
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    format_error(path, format!("non-numeric field '{}' at line {}", field, line))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(format_error(
                    path,
                    format!(
                        "line {} has {} fields, expecting {}",
                        line,
                        row.len(),
                        first.len()
                    ),
                ));
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(format_error(path, "no matrix rows found"));
    }
    Matrix::from_rows(&rows).map_err(|e| format_error(path, e.to_string()))
}

fn csv_error(path: &Path, err: csv::Error) -> MatrixError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(source) = err.into_kind() {
            return io_error(path, source);
        }
        return format_error(path, "I/O failure while parsing");
    }
    format_error(path, err.to_string())
}

fn read_serialized(path: &Path) -> Result<Matrix> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    match serde_json::from_str::<StoredObject>(&content) {
        Ok(StoredObject::Matrix(m)) => Ok(m),
        Ok(other) => Err(MatrixError::TypeMismatch {
            path: path.to_path_buf(),
            found: other.kind().to_string(),
        }),
        Err(err) => match serde_json::from_str::<serde_json::Value>(&content) {
            // well-formed JSON that is not a stored matrix
            Ok(value) if describe(&value) != "matrix" => Err(MatrixError::TypeMismatch {
                path: path.to_path_buf(),
                found: describe(&value),
            }),
            _ => Err(format_error(path, err.to_string())),
        },
    }
}

fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => match map.get("type").and_then(|t| t.as_str()) {
            Some(kind) => kind.to_string(),
            None => "object".to_string(),
        },
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::Bool(_) => "boolean".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

/// Write `matrix` to `path` in the given format, replacing any existing file.
pub fn write_matrix<P: AsRef<Path>>(matrix: &Matrix, path: P, format: MatrixFormat) -> Result<()> {
    let path = path.as_ref();
    matrix.ensure_populated()?;
    debug!("writing {} matrix to {}", format, path.display());

    match format {
        MatrixFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_path(path)
                .map_err(|e| csv_error(path, e))?;
            for r in 0..matrix.nrows() {
                let fields: Vec<String> = matrix.row(r)?.iter().map(|v| v.to_string()).collect();
                writer.write_record(&fields).map_err(|e| csv_error(path, e))?;
            }
            writer.flush().map_err(|e| io_error(path, e))
        }
        MatrixFormat::Serialized => {
            let json = serde_json::to_string_pretty(&StoredObject::Matrix(matrix.clone()))
                .map_err(|e| format_error(path, e.to_string()))?;
            fs::write(path, json).map_err(|e| io_error(path, e))
        }
    }
}

/// Store a vector in the serialized envelope.
pub fn write_vector<P: AsRef<Path>>(vector: &Vector, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&StoredObject::Vector(vector.clone()))
        .map_err(|e| format_error(path, e.to_string()))?;
    fs::write(path, json).map_err(|e| io_error(path, e))
}
