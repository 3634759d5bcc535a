//! Error kinds for the `trafficflow` pipeline and query layer.
//!
//! Per-row and per-file parse failures during ingestion are absorbed with a
//! logged warning and never surface here; only directory-level or
//! total-failure conditions become errors. The query layer maps
//! [`PipelineError::UpstreamUnavailable`] to a "data not available" response
//! instead of a raw failure.

use std::path::PathBuf;

use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The raw data directory is missing, or it contains no matching files.
    #[error("raw data not found: {0}")]
    NotFound(PathBuf),

    /// Every matching raw file failed to parse.
    #[error("no valid data could be loaded from {0}")]
    NoValidData(PathBuf),

    /// The persisted output table is missing when a query is attempted.
    #[error("filtered dataset not available at {0}")]
    UpstreamUnavailable(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
