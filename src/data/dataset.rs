//! Labeled dataset ingestion from CSV files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    data::labels::parse_tags,
    error::Error,
};

/// One raw training example.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub text: String,
    pub tags: Vec<String>,
}

/// Column names to read from the dataset files.
#[derive(Debug, Clone)]
pub struct DatasetColumns {
    pub text: String,
    pub emotions: String,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            text: "text".into(),
            emotions: "emotions".into(),
        }
    }
}

/// Load every example from a CSV file, or from all CSV files below a directory.
///
/// Files are visited in path order so repeated runs see the same row order.
pub fn load_examples(path: &Path, columns: &DatasetColumns) -> Result<Vec<Example>> {
    let files = csv_files(path)?;
    let mut examples = Vec::new();
    for file in &files {
        let before = examples.len();
        read_csv(file, columns, &mut examples)
            .with_context(|| format!("reading dataset file {}", file.display()))?;
        debug!(path = %file.display(), rows = examples.len() - before, "loaded dataset file");
    }
    if examples.is_empty() {
        return Err(Error::EmptyDataset(path.to_path_buf()).into());
    }
    info!(files = files.len(), rows = examples.len(), "loaded dataset");
    Ok(examples)
}

fn csv_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", path.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("csv")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_csv(path: &Path, columns: &DatasetColumns, out: &mut Vec<Example>) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let text_idx = position(&columns.text)?;
    let emotions_idx = position(&columns.emotions)?;

    for (offset, record) in reader.records().enumerate() {
        // header is line 1
        let row = offset + 2;
        let record = record.with_context(|| format!("row {row}"))?;
        let text = record.get(text_idx).unwrap_or_default().to_string();
        let tags = parse_tags(record.get(emotions_idx).unwrap_or_default(), row)?;
        out.push(Example { text, tags });
    }
    Ok(())
}
