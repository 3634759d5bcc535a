//! Row-level normalization of raw readings.
//!
//! Each rule is applied independently per row, with no cross-row state:
//! - `nombre_visiteurs`: parsed as a number; unparsable or missing becomes 0;
//!   negative values clamp to 0. The simulator's `-1` store-closed sentinel
//!   zeroes out like any other negative value.
//! - `id_du_capteur`: parsed as an integer; unparsable or missing becomes the
//!   `-1` unknown-sensor sentinel, which still aggregates as its own group.
//! - `heure`: parsed to a time-of-day; a parse failure passes through as
//!   `None` since aggregation ignores time-of-day.
//! - `unite` and the rest pass through unvalidated.
//!
//! A row whose date fails to parse cannot be grouped at all and is dropped
//! with a warning, consistent with the absorb-and-log failure policy.

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::models::{CleanReading, RawReading, SENSOR_SENTINEL};

// ---

/// Normalize a raw table into clean readings, dropping only rows with an
/// unparsable date.
pub fn clean_readings(raw: Vec<RawReading>) -> Vec<CleanReading> {
    // ---
    let total = raw.len();
    let cleaned: Vec<CleanReading> = raw.into_iter().filter_map(clean_one).collect();
    if cleaned.len() < total {
        warn!(
            "Dropped {} of {} raw rows with unparsable dates",
            total - cleaned.len(),
            total
        );
    }
    debug!("Cleaned {} readings", cleaned.len());
    cleaned
}

fn clean_one(raw: RawReading) -> Option<CleanReading> {
    // ---
    let date = match raw.date.parse::<NaiveDate>() {
        Ok(d) => d,
        Err(e) => {
            warn!("Skipping row with unparsable date {:?}: {}", raw.date, e);
            return None;
        }
    };

    Some(CleanReading {
        date,
        hour: raw.hour.parse::<NaiveTime>().ok(),
        sensor_id: clean_sensor_id(raw.sensor_id.as_deref()),
        store_id: raw.store_id,
        visitor_count: clean_visitor_count(raw.visitor_count.as_deref()),
        unit: raw.unit,
    })
}

/// Coerce the visitor count to a non-negative number.
fn clean_visitor_count(raw: Option<&str>) -> f64 {
    // ---
    raw.and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
}

/// Coerce the sensor id to an integer, substituting the unknown-sensor
/// sentinel for anything unparsable.
fn clean_sensor_id(raw: Option<&str>) -> i32 {
    // ---
    raw.and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(SENSOR_SENTINEL)
}
