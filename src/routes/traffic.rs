//! `GET /api/traffic/{store_id}` — a store's daily traffic series,
//! optionally date-bounded.

use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::DailyTraffic;

use super::{load_table, ApiError};

// ---

pub fn router() -> Router<Config> {
    Router::new().route("/api/traffic/{store_id}", get(handler))
}

#[derive(Debug, Deserialize)]
struct TrafficQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct TrafficResponse {
    store_id: String,
    data_count: usize,
    data: Vec<DailyTraffic>,
}

async fn handler(
    Path(store_id): Path<String>,
    Query(params): Query<TrafficQuery>,
    State(config): State<Config>,
) -> Result<Json<TrafficResponse>, ApiError> {
    // ---
    let table = load_table(&config)?;

    let store_rows: Vec<DailyTraffic> = table
        .into_iter()
        .filter(|r| r.store_id == store_id)
        .collect();
    if store_rows.is_empty() {
        return Err(ApiError::NotFound(format!("store {store_id} not found")));
    }

    let data = filter_date_range(store_rows, params.start_date, params.end_date);
    Ok(Json(TrafficResponse {
        store_id,
        data_count: data.len(),
        data,
    }))
}

/// Keep rows within the inclusive `[start, end]` date bounds, when given.
pub(crate) fn filter_date_range(
    rows: Vec<DailyTraffic>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<DailyTraffic> {
    // ---
    rows.into_iter()
        .filter(|r| start.map_or(true, |s| r.date >= s))
        .filter(|r| end.map_or(true, |e| r.date <= e))
        .collect()
}
