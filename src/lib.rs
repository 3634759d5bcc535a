//! `trafficflow` — retail foot-traffic analytics pipeline.
//!
//! Ingests simulated per-sensor visitor readings from monthly CSV files,
//! cleans and aggregates them into a daily traffic table, flags anomalous
//! days against a trailing same-weekday baseline, persists the result as
//! Parquet, and exposes it through a read-only query API.
//!
//! Data flows strictly ingest → clean → aggregate → baseline → score →
//! export; no stage feeds back into an earlier one. The module layout
//! follows the Explicit Module Boundary Pattern (EMBP): one module per
//! pipeline stage, a `routes` gateway for the HTTP surface, and this file
//! re-exporting the types shared across boundaries.

pub mod aggregate;
pub mod anomaly;
pub mod baseline;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod simulator;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use models::{CleanReading, DailyTraffic, RawReading, SENSOR_SENTINEL};
