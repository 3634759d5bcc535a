//! Route gateway for the traffic query API.
//!
//! Each endpoint lives in its own sibling module and exports a subrouter;
//! this gateway merges them so `main.rs` never sees individual endpoints.
//! All endpoints are read-only views over the persisted Parquet table. The
//! API holds no independent state and performs no computation beyond
//! filtering and summarizing what the pipeline already produced.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;

use crate::config::Config;
use crate::error::PipelineError;
use crate::export;
use crate::models::DailyTraffic;

mod anomalies;
mod health;
mod metrics;
mod sensors;
mod stores;
mod traffic;

// ---

pub fn router(config: Config) -> Router {
    // ---
    Router::new()
        .merge(health::router())
        .merge(stores::router())
        .merge(sensors::router())
        .merge(traffic::router())
        .merge(anomalies::router())
        .merge(metrics::router())
        .with_state(config)
}

/// Failure shape shared by all endpoints.
///
/// A missing upstream table and an unknown store/sensor both map to 404 with
/// a human-readable detail, never a raw panic or a bare 500 body.
pub(crate) enum ApiError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Load the persisted table for one request.
pub(crate) fn load_table(config: &Config) -> Result<Vec<DailyTraffic>, ApiError> {
    // ---
    export::read_daily_traffic(&config.filtered_path).map_err(|e| match e {
        PipelineError::UpstreamUnavailable(path) => {
            tracing::warn!("Query before any pipeline run: {}", path.display());
            ApiError::NotFound("data not available - run the pipeline first".to_string())
        }
        other => {
            tracing::error!("Failed to load persisted table: {}", other);
            ApiError::Internal(other.to_string())
        }
    })
}
