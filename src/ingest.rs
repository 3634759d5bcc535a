//! Raw file ingestion: finds all monthly `visiteurs_*.csv` files and
//! concatenates them into one unordered collection of raw readings.
//!
//! Failure policy (deliberately tolerant): a malformed row or an unreadable
//! file is logged and skipped, never fatal. Only directory-level conditions
//! abort the run: a missing directory or zero matching files is `NotFound`,
//! and all files failing to parse is `NoValidData`.

use std::path::Path;

use glob::glob;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::models::RawReading;

// ---

/// Load every matching raw CSV under `raw_data_dir` into one table.
///
/// Files are visited in path order so that downstream output is reproducible
/// for identical inputs.
pub fn load_raw_readings(raw_data_dir: &Path) -> Result<Vec<RawReading>> {
    // ---
    if !raw_data_dir.is_dir() {
        return Err(PipelineError::NotFound(raw_data_dir.to_path_buf()));
    }

    let pattern = raw_data_dir.join("visiteurs_*.csv");
    let mut files: Vec<_> = glob(&pattern.to_string_lossy())
        .map_err(|e| {
            warn!("Unusable raw data path {}: {}", raw_data_dir.display(), e);
            PipelineError::NotFound(raw_data_dir.to_path_buf())
        })?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::NotFound(raw_data_dir.to_path_buf()));
    }

    let mut readings = Vec::new();
    let mut files_loaded = 0usize;

    for file in &files {
        match load_one_file(file) {
            Ok(rows) => {
                debug!("Loaded {} rows from {}", rows.len(), file.display());
                readings.extend(rows);
                files_loaded += 1;
            }
            Err(e) => warn!("Error loading {}: {}", file.display(), e),
        }
    }

    if files_loaded == 0 {
        return Err(PipelineError::NoValidData(raw_data_dir.to_path_buf()));
    }

    Ok(readings)
}

/// Read one CSV file, skipping rows that fail to deserialize.
///
/// A file where every row fails counts as a failed file so that the caller
/// can distinguish "all inputs are garbage" from "some rows were noisy".
fn load_one_file(path: &Path) -> Result<Vec<RawReading>> {
    // ---
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.deserialize::<RawReading>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                warn!("Skipping malformed row in {}: {}", path.display(), e);
            }
        }
    }

    if rows.is_empty() && skipped > 0 {
        return Err(PipelineError::NoValidData(path.to_path_buf()));
    }

    Ok(rows)
}
