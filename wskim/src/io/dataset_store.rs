//! Output dataset persistence.
//!
//! The selected rows are written once, at the end of a run, as a single JSON
//! document together with the provenance needed to reproduce it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::core::cutflow::CutFlow;
use crate::core::types::SelectedMuon;
use crate::io::config::SelectionConfig;

/// Dataset name written into every output file.
pub const DATASET_NAME: &str = "dataset";

/// Column descriptors, in row tuple order: `(name, title, unit, min, max)`.
///
/// The range is the plotting range of the column. Row values are stored as
/// selected and are never clipped to it.
pub const COLUMNS: [(&str, &str, &str, f64, f64); 4] = [
    ("TMass", "Transverse Mass", "GeV/c^{2}", 0.0, 160.0),
    ("MET", "Missing E_T", "GeV", 0.0, 100.0),
    ("Pt", "p_T", "GeV/c", 0.0, 200.0),
    ("Eta", "#eta", "", -2.4, 2.4),
];

/// Name, axis title, unit and nominal range of one dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub title: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
}

pub fn column_specs() -> Vec<ColumnSpec> {
    COLUMNS
        .iter()
        .map(|&(name, title, unit, min, max)| ColumnSpec {
            name: name.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            min,
            max,
        })
        .collect()
}

/// One input file and its content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDigest {
    pub path: String,
    pub sha256: String,
}

/// On-disk dataset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    /// RFC 3339 UTC time the file was produced.
    pub created_at: String,
    pub sources: Vec<SourceDigest>,
    pub config: SelectionConfig,
    pub cutflow: CutFlow,
    pub rows: Vec<SelectedMuon>,
}

impl DatasetFile {
    pub fn new(
        sources: Vec<SourceDigest>,
        config: SelectionConfig,
        cutflow: CutFlow,
        rows: Vec<SelectedMuon>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: DATASET_NAME.to_string(),
            columns: column_specs(),
            created_at: created_at.to_rfc3339(),
            sources,
            config,
            cutflow,
            rows,
        }
    }
}

/// Hash every input so the output records exactly what it was built from.
pub fn digest_sources(paths: &[PathBuf]) -> Result<Vec<SourceDigest>> {
    paths
        .iter()
        .map(|path| {
            Ok(SourceDigest {
                path: path.display().to_string(),
                sha256: file_sha256(path)?,
            })
        })
        .collect()
}

/// Write the dataset as pretty JSON with a trailing newline, atomically.
#[instrument(skip_all, fields(path = %path.display(), rows = dataset.rows.len()))]
pub fn write_dataset(path: &Path, dataset: &DatasetFile) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(dataset).context("serialize dataset")?;
    buf.push('\n');
    super::write_atomic(path, &buf)?;
    debug!("dataset written");
    Ok(())
}

pub fn load_dataset(path: &Path) -> Result<DatasetFile> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse dataset {}", path.display()))
}

fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Ok(hex::encode(hasher.finalize()))
}
