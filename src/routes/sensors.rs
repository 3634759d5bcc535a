//! `GET /api/sensors/{store_id}` — distinct sensors for one store.

use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::Config;

use super::{load_table, ApiError};

// ---

pub fn router() -> Router<Config> {
    Router::new().route("/api/sensors/{store_id}", get(handler))
}

#[derive(Serialize)]
struct SensorsResponse {
    store_id: String,
    sensors: Vec<i32>,
    count: usize,
}

async fn handler(
    Path(store_id): Path<String>,
    State(config): State<Config>,
) -> Result<Json<SensorsResponse>, ApiError> {
    // ---
    let table = load_table(&config)?;

    let mut sensors: Vec<i32> = table
        .iter()
        .filter(|r| r.store_id == store_id)
        .map(|r| r.sensor_id)
        .collect();
    if sensors.is_empty() {
        return Err(ApiError::NotFound(format!("store {store_id} not found")));
    }
    sensors.sort_unstable();
    sensors.dedup();

    let count = sensors.len();
    Ok(Json(SensorsResponse {
        store_id,
        sensors,
        count,
    }))
}
