//! Parquet persistence of the enriched daily traffic table.
//!
//! The on-disk schema keeps all nine columns with their native types:
//! `date` is a true Date column (not a string) and `pct_change` /
//! `moyenne_mobile_4_semaines` are nullable floats, so a write/read round
//! trip is lossless. The read side is what the query API consumes; a missing
//! file there is `UpstreamUnavailable`, not a crash.

use std::fs::{self, File};
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::DailyTraffic;

// ---

const COL_DATE: &str = "date";
const COL_STORE: &str = "id_du_magasin";
const COL_SENSOR: &str = "id_du_capteur";
const COL_TRAFFIC: &str = "trafic_journalier";
const COL_WEEKDAY: &str = "jour_semaine";
const COL_MONTH: &str = "mois";
const COL_YEAR: &str = "annee";
const COL_ROLLING_AVG: &str = "moyenne_mobile_4_semaines";
const COL_PCT_CHANGE: &str = "pct_change";

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date")
}

/// Persist the enriched table to `path`, creating parent directories as
/// needed. Row order is preserved as given.
pub fn write_daily_traffic(rows: &[DailyTraffic], path: &Path) -> Result<()> {
    // ---
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut df = to_dataframe(rows)?;
    let file = File::create(path)?;
    ParquetWriter::new(file).finish(&mut df)?;

    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Load the persisted table back into memory.
///
/// Returns `UpstreamUnavailable` when the file does not exist, which the
/// query layer surfaces as a "data not available" response.
pub fn read_daily_traffic(path: &Path) -> Result<Vec<DailyTraffic>> {
    // ---
    if !path.is_file() {
        return Err(PipelineError::UpstreamUnavailable(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    from_dataframe(&df)
}

// ---

fn to_dataframe(rows: &[DailyTraffic]) -> Result<DataFrame> {
    // ---
    let days: Vec<i32> = rows
        .iter()
        .map(|r| r.date.signed_duration_since(epoch()).num_days() as i32)
        .collect();
    let date = Series::new(COL_DATE, days).cast(&DataType::Date)?;

    let columns = vec![
        date,
        Series::new(
            COL_STORE,
            rows.iter().map(|r| r.store_id.as_str()).collect::<Vec<_>>(),
        ),
        Series::new(
            COL_SENSOR,
            rows.iter().map(|r| r.sensor_id).collect::<Vec<i32>>(),
        ),
        Series::new(
            COL_TRAFFIC,
            rows.iter().map(|r| r.traffic).collect::<Vec<f64>>(),
        ),
        Series::new(
            COL_WEEKDAY,
            rows.iter().map(|r| r.weekday_name.as_str()).collect::<Vec<_>>(),
        ),
        Series::new(
            COL_MONTH,
            rows.iter().map(|r| r.month_name.as_str()).collect::<Vec<_>>(),
        ),
        Series::new(COL_YEAR, rows.iter().map(|r| r.year).collect::<Vec<i32>>()),
        Series::new(
            COL_ROLLING_AVG,
            rows.iter().map(|r| r.rolling_avg).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            COL_PCT_CHANGE,
            rows.iter().map(|r| r.pct_change).collect::<Vec<Option<f64>>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}

fn from_dataframe(df: &DataFrame) -> Result<Vec<DailyTraffic>> {
    // ---
    let date = df.column(COL_DATE)?.cast(&DataType::Int32)?;
    let date = date.i32()?;
    let store = df.column(COL_STORE)?.str()?;
    let sensor = df.column(COL_SENSOR)?.i32()?;
    let traffic = df.column(COL_TRAFFIC)?.f64()?;
    let weekday = df.column(COL_WEEKDAY)?.str()?;
    let month = df.column(COL_MONTH)?.str()?;
    let year = df.column(COL_YEAR)?.i32()?;
    let rolling_avg = df.column(COL_ROLLING_AVG)?.f64()?;
    let pct_change = df.column(COL_PCT_CHANGE)?.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(DailyTraffic {
            date: epoch() + chrono::Duration::days(i64::from(required(date.get(i), COL_DATE)?)),
            store_id: required(store.get(i), COL_STORE)?.to_string(),
            sensor_id: required(sensor.get(i), COL_SENSOR)?,
            traffic: required(traffic.get(i), COL_TRAFFIC)?,
            weekday_name: required(weekday.get(i), COL_WEEKDAY)?.to_string(),
            month_name: required(month.get(i), COL_MONTH)?.to_string(),
            year: required(year.get(i), COL_YEAR)?,
            rolling_avg: rolling_avg.get(i),
            pct_change: pct_change.get(i),
        });
    }
    Ok(rows)
}

/// A null in a non-nullable column means the file was not produced by this
/// pipeline; surface it instead of inventing a value.
fn required<T>(value: Option<T>, column: &str) -> Result<T> {
    value.ok_or_else(|| {
        PolarsError::ComputeError(format!("unexpected null in column {column}").into()).into()
    })
}
