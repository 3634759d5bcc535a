//! `GET /api/metrics/{store_id}/{sensor_id}` — summary statistics for one
//! sensor of one store.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::anomaly::{self, DEFAULT_ANOMALY_THRESHOLD};
use crate::config::Config;
use crate::models::DailyTraffic;

use super::{load_table, ApiError};

// ---

pub fn router() -> Router<Config> {
    Router::new().route("/api/metrics/{store_id}/{sensor_id}", get(handler))
}

#[derive(Serialize)]
struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize)]
struct TrafficMetrics {
    mean: f64,
    median: f64,
    min: f64,
    max: f64,
    std: Option<f64>,
}

#[derive(Serialize)]
struct AnomalySummary {
    count: usize,
    percentage: f64,
}

#[derive(Serialize)]
struct MetricsResponse {
    store_id: String,
    sensor_id: i32,
    data_points: usize,
    date_range: DateRange,
    traffic_metrics: TrafficMetrics,
    anomalies: AnomalySummary,
    /// Mean traffic per weekday name.
    weekly_pattern: BTreeMap<String, f64>,
}

async fn handler(
    Path((store_id, sensor_id)): Path<(String, i32)>,
    State(config): State<Config>,
) -> Result<Json<MetricsResponse>, ApiError> {
    // ---
    let table = load_table(&config)?;

    let rows: Vec<DailyTraffic> = table
        .into_iter()
        .filter(|r| r.store_id == store_id && r.sensor_id == sensor_id)
        .collect();
    if rows.is_empty() {
        return Err(ApiError::NotFound(format!(
            "sensor {sensor_id} not found for store {store_id}"
        )));
    }

    Ok(Json(summarize(store_id, sensor_id, &rows)))
}

fn summarize(store_id: String, sensor_id: i32, rows: &[DailyTraffic]) -> MetricsResponse {
    // ---
    let traffic: Vec<f64> = rows.iter().map(|r| r.traffic).collect();
    let anomaly_count = rows
        .iter()
        .filter(|r| anomaly::is_anomaly(r, DEFAULT_ANOMALY_THRESHOLD))
        .count();

    let mut weekly: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for r in rows {
        let slot = weekly.entry(r.weekday_name.clone()).or_insert((0.0, 0));
        slot.0 += r.traffic;
        slot.1 += 1;
    }

    MetricsResponse {
        store_id,
        sensor_id,
        data_points: rows.len(),
        date_range: DateRange {
            start: rows.iter().map(|r| r.date).min().expect("rows is non-empty"),
            end: rows.iter().map(|r| r.date).max().expect("rows is non-empty"),
        },
        traffic_metrics: TrafficMetrics {
            mean: mean(&traffic),
            median: median(&traffic),
            min: traffic.iter().copied().fold(f64::INFINITY, f64::min),
            max: traffic.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std: sample_std(&traffic),
        },
        anomalies: AnomalySummary {
            count: anomaly_count,
            percentage: anomaly_count as f64 / rows.len() as f64 * 100.0,
        },
        weekly_pattern: weekly
            .into_iter()
            .map(|(day, (sum, n))| (day, sum / n as f64))
            .collect(),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    // ---
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n − 1 denominator); `None` for a single point.
fn sample_std(values: &[f64]) -> Option<f64> {
    // ---
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}
