//! `GET /api/anomalies` — rows whose |pct_change| exceeds a caller-chosen
//! threshold, optionally scoped to one store and a date range.

use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::anomaly::{self, DEFAULT_ANOMALY_THRESHOLD};
use crate::config::Config;
use crate::models::DailyTraffic;

use super::traffic::filter_date_range;
use super::{load_table, ApiError};

// ---

pub fn router() -> Router<Config> {
    Router::new().route("/api/anomalies", get(handler))
}

#[derive(Debug, Deserialize)]
struct AnomaliesQuery {
    threshold: Option<f64>,
    store_id: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct AnomaliesResponse {
    anomalies_count: usize,
    threshold: f64,
    anomalies: Vec<DailyTraffic>,
}

async fn handler(
    Query(params): Query<AnomaliesQuery>,
    State(config): State<Config>,
) -> Result<Json<AnomaliesResponse>, ApiError> {
    // ---
    let table = load_table(&config)?;
    let threshold = params.threshold.unwrap_or(DEFAULT_ANOMALY_THRESHOLD);

    let scoped: Vec<DailyTraffic> = table
        .into_iter()
        .filter(|r| anomaly::is_anomaly(r, threshold))
        .filter(|r| params.store_id.as_ref().map_or(true, |s| &r.store_id == s))
        .collect();
    let anomalies = filter_date_range(scoped, params.start_date, params.end_date);

    Ok(Json(AnomaliesResponse {
        anomalies_count: anomalies.len(),
        threshold,
        anomalies,
    }))
}
