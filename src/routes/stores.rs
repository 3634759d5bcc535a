//! `GET /stores` — distinct stores present in the persisted table.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::Config;

use super::{load_table, ApiError};

// ---

pub fn router() -> Router<Config> {
    Router::new().route("/stores", get(handler))
}

#[derive(Serialize)]
struct StoresResponse {
    stores: Vec<String>,
    count: usize,
}

async fn handler(State(config): State<Config>) -> Result<Json<StoresResponse>, ApiError> {
    // ---
    let table = load_table(&config)?;

    let mut stores: Vec<String> = table.into_iter().map(|r| r.store_id).collect();
    stores.sort();
    stores.dedup();

    let count = stores.len();
    Ok(Json(StoresResponse { stores, count }))
}
