//! Batch pipeline orchestration.
//!
//! Runs the six stages strictly in order — ingest, clean, aggregate,
//! baseline, score, export — over an in-memory table owned by the run.
//! A run either completes or fails with a distinct error; reruns fully
//! recompute from the raw inputs.

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::DailyTraffic;
use crate::{aggregate, anomaly, baseline, clean, export, ingest};

// ---

/// Execute the full batch pipeline and persist the enriched table.
///
/// Returns the final table so callers (and tests) can inspect what was
/// persisted without re-reading it.
pub fn run(config: &Config) -> Result<Vec<DailyTraffic>> {
    // ---
    info!("Pipeline start: {}", config.raw_data_dir.display());

    let raw = ingest::load_raw_readings(&config.raw_data_dir)?;
    info!("Step 1: ingested {} raw readings", raw.len());

    let cleaned = clean::clean_readings(raw);
    info!("Step 2: cleaned down to {} readings", cleaned.len());

    let mut table = aggregate::daily_traffic(&cleaned);
    info!("Step 3: aggregated into {} daily rows", table.len());

    baseline::rolling_baseline(&mut table);
    info!("Step 4: rolling baselines computed");

    anomaly::score_anomalies(&mut table);
    info!("Step 5: anomaly scores computed");

    export::write_daily_traffic(&table, &config.filtered_path)?;
    info!(
        "Step 6: exported enriched table to {}",
        config.filtered_path.display()
    );

    Ok(table)
}
