//! Reference dataset loading and sampling.
//!
//! The monitor replays rows from the cleaned churn dataset produced by the
//! preprocessing pipeline. The table is loaded once at startup, held
//! read-only for the process lifetime, and sampled uniformly with
//! replacement on every loop iteration.

use crate::error::{MonitorError, Result};
use rand::Rng;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Immutable in-memory feature table
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// One feature row drawn from the dataset; lives for a single loop iteration
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub columns: &'a [String],
    pub values: &'a [Value],
}

impl ReferenceDataset {
    /// Load the dataset from `primary`, falling back to a recursive search
    /// under `discovery_root` for a file named `file_name`.
    ///
    /// The label column is stripped at load time so drawn samples contain
    /// features only. Fails with `DataUnavailable` if no file is found or
    /// the table ends up empty; sampling is infallible afterwards.
    pub fn load(
        primary: &Path,
        discovery_root: &Path,
        file_name: &str,
        label_column: &str,
    ) -> Result<Self> {
        let path = resolve_dataset_path(primary, discovery_root, file_name)?;
        info!(path = %path.display(), "loading reference dataset");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| MonitorError::DataUnavailable(format!("{}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| MonitorError::DataUnavailable(format!("{}: {}", path.display(), e)))?
            .clone();

        let label_index = headers.iter().position(|h| h == label_column);

        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != label_index)
            .map(|(_, h)| h.to_string())
            .collect();

        if columns.is_empty() {
            return Err(MonitorError::DataUnavailable(format!(
                "{}: no feature columns",
                path.display()
            )));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| MonitorError::DataUnavailable(format!("{}: {}", path.display(), e)))?;
            let row: Vec<Value> = record
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != label_index)
                .map(|(_, cell)| parse_cell(cell))
                .collect();
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(MonitorError::DataUnavailable(format!(
                "{}: dataset has no rows",
                path.display()
            )));
        }

        info!(
            rows = rows.len(),
            columns = columns.len(),
            label_dropped = label_index.is_some(),
            "reference dataset loaded"
        );

        Ok(Self { columns, rows })
    }

    /// Draw one uniformly-random row with replacement.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Sample<'_> {
        let index = rng.gen_range(0..self.rows.len());
        Sample {
            columns: &self.columns,
            values: &self.rows[index],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Check the primary path first, then walk `discovery_root` for the first
/// file with the expected name.
fn resolve_dataset_path(primary: &Path, discovery_root: &Path, file_name: &str) -> Result<PathBuf> {
    if primary.is_file() {
        return Ok(primary.to_path_buf());
    }

    if let Some(found) = discover_file(discovery_root, file_name) {
        return Ok(found);
    }

    Err(MonitorError::DataUnavailable(format!(
        "no file at {} and no '{}' found under {}",
        primary.display(),
        file_name,
        discovery_root.display()
    )))
}

fn discover_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.file_name().is_some_and(|n| n == file_name) {
            return Some(path);
        }
        if path.is_dir() {
            subdirs.push(path);
        }
    }

    subdirs
        .into_iter()
        .find_map(|dir| discover_file(&dir, file_name))
}

/// CSV cells keep their natural JSON type: integer, float or string.
fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(trimmed.to_string())
}
