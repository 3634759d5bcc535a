//! Data models for the foot-traffic pipeline.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ---

/// One raw sensor observation as it appears in a monthly CSV file.
///
/// Fault-prone fields stay as raw strings: the simulator deliberately injects
/// missing sensor ids, out-of-range counts and garbled units, and the cleaner
/// is the one place that decides what those become.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReading {
    // ---
    pub date: String,
    #[serde(rename = "heure")]
    pub hour: String,
    #[serde(rename = "id_du_capteur")]
    pub sensor_id: Option<String>,
    #[serde(rename = "id_du_magasin")]
    pub store_id: String,
    #[serde(rename = "nombre_visiteurs")]
    pub visitor_count: Option<String>,
    #[serde(rename = "unite")]
    pub unit: String,
}

/// A normalized reading, one per raw row that carried a parsable date.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReading {
    // ---
    pub date: NaiveDate,
    /// Time-of-day; `None` when the raw field failed to parse. Aggregation
    /// ignores it either way.
    pub hour: Option<NaiveTime>,
    /// Sensor id, or [`SENSOR_SENTINEL`] when missing/unparsable.
    pub sensor_id: i32,
    pub store_id: String,
    /// Visitor count after cleaning; always `>= 0`.
    pub visitor_count: f64,
    /// Unit string, passed through unvalidated.
    pub unit: String,
}

/// Placeholder sensor id substituted when `id_du_capteur` is missing or
/// unparsable. Sentinel rows aggregate together as their own sensor group.
pub const SENSOR_SENTINEL: i32 = -1;

/// One row of the enriched daily traffic table, unique per
/// (date, store_id, sensor_id).
///
/// Serialized field names match the persisted Parquet schema, so API
/// responses and the on-disk table read the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTraffic {
    // ---
    pub date: NaiveDate,
    #[serde(rename = "id_du_magasin")]
    pub store_id: String,
    #[serde(rename = "id_du_capteur")]
    pub sensor_id: i32,
    /// Sum of same-day cleaned visitor counts for this sensor; `>= 0`.
    #[serde(rename = "trafic_journalier")]
    pub traffic: f64,
    #[serde(rename = "jour_semaine")]
    pub weekday_name: String,
    #[serde(rename = "mois")]
    pub month_name: String,
    #[serde(rename = "annee")]
    pub year: i32,
    /// Trailing same-weekday mean (window <= 4), set by the baseline
    /// estimator. `None` only before that stage has run.
    #[serde(rename = "moyenne_mobile_4_semaines")]
    pub rolling_avg: Option<f64>,
    /// Percentage deviation from the baseline, clamped to `[-100, 200]`;
    /// `None` when the baseline is zero.
    pub pct_change: Option<f64>,
}
