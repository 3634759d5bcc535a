//! Service banner and health check endpoints.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Config;

// ---

pub fn router() -> Router<Config> {
    // ---
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// Handle `GET /`: list the available endpoints.
async fn root() -> Json<Value> {
    // ---
    Json(json!({
        "message": "Retail foot-traffic analytics API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/stores",
            "/api/traffic/{store_id}",
            "/api/sensors/{store_id}",
            "/api/anomalies",
            "/api/metrics/{store_id}/{sensor_id}",
        ],
    }))
}

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    data_available: bool,
}

/// Handle `GET /health`.
///
/// Always answers 200 so orchestrators see a live process; the body reports
/// whether the persisted table exists yet.
async fn health(State(config): State<Config>) -> Json<HealthResponse> {
    // ---
    Json(HealthResponse {
        status: "ok",
        data_available: config.filtered_path.is_file(),
    })
}
