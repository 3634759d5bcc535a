//! Daily aggregation: one traffic row per (date, store, sensor).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::models::{CleanReading, DailyTraffic};

// ---

/// Sum cleaned per-hour readings into one row per (date, store, sensor) and
/// derive the calendar attributes used by the baseline estimator.
///
/// Output is sorted by (date, sensor_id, store_id) so that downstream
/// processing and the persisted table are reproducible for identical inputs.
pub fn daily_traffic(readings: &[CleanReading]) -> Vec<DailyTraffic> {
    // ---
    let mut totals: BTreeMap<(NaiveDate, i32, String), f64> = BTreeMap::new();

    for r in readings {
        *totals
            .entry((r.date, r.sensor_id, r.store_id.clone()))
            .or_insert(0.0) += r.visitor_count;
    }

    let rows: Vec<DailyTraffic> = totals
        .into_iter()
        .map(|((date, sensor_id, store_id), traffic)| DailyTraffic {
            date,
            store_id,
            sensor_id,
            traffic,
            weekday_name: date.format("%A").to_string(),
            month_name: date.format("%B").to_string(),
            year: date.year(),
            rolling_avg: None,
            pct_change: None,
        })
        .collect();

    debug!("Aggregated {} readings into {} daily rows", readings.len(), rows.len());
    rows
}
