//! Configuration loader for the `trafficflow` backend service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). By consolidating configuration logic
//! here, we avoid scattering `env::var` calls throughout the codebase.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Directory holding the monthly raw CSV files (`visiteurs_*.csv`).
    pub raw_data_dir: PathBuf,

    /// Path of the persisted Parquet table consumed by the query API.
    pub filtered_path: PathBuf,

    /// TCP port the query API binds to.
    pub api_port: u16,

    /// First date covered by `generate` mode (inclusive).
    pub sim_start_date: NaiveDate,

    /// Last date covered by `generate` mode (inclusive).
    pub sim_end_date: NaiveDate,

    /// Probability of appending one corrupted row per store per day.
    pub sim_noise_rate: f64,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `RAW_DATA_DIR` – raw CSV directory (default: `data/raw`)
/// - `FILTERED_PATH` – persisted Parquet path
///   (default: `data/filtered/daily_traffic_anomalies.parquet`)
/// - `TRAFFIC_API_PORT` – query API port (default: 8080)
/// - `SIM_START_DATE` / `SIM_END_DATE` – generation range, `YYYY-MM-DD`
///   (defaults: `2025-01-01` to today)
/// - `SIM_NOISE_RATE` – corrupted-row probability (default: 0.1)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let raw_data_dir = PathBuf::from(env_or!("RAW_DATA_DIR", "data/raw"));
    let filtered_path = PathBuf::from(env_or!(
        "FILTERED_PATH",
        "data/filtered/daily_traffic_anomalies.parquet"
    ));
    let api_port = parse_env!("TRAFFIC_API_PORT", u16, 8080);

    let default_start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date literal");
    let sim_start_date = parse_env!("SIM_START_DATE", NaiveDate, default_start);
    let sim_end_date = parse_env!(
        "SIM_END_DATE",
        NaiveDate,
        chrono::Utc::now().date_naive()
    );
    let sim_noise_rate = parse_env!("SIM_NOISE_RATE", f64, 0.1);

    if !(0.0..=1.0).contains(&sim_noise_rate) {
        return Err(anyhow!(
            "SIM_NOISE_RATE must be within [0, 1], got {sim_noise_rate}"
        ));
    }

    Ok(Config {
        raw_data_dir,
        filtered_path,
        api_port,
        sim_start_date,
        sim_end_date,
        sim_noise_rate,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  RAW_DATA_DIR     : {}", self.raw_data_dir.display());
        tracing::info!("  FILTERED_PATH    : {}", self.filtered_path.display());
        tracing::info!("  TRAFFIC_API_PORT : {}", self.api_port);
        tracing::info!("  SIM_START_DATE   : {}", self.sim_start_date);
        tracing::info!("  SIM_END_DATE     : {}", self.sim_end_date);
        tracing::info!("  SIM_NOISE_RATE   : {}", self.sim_noise_rate);
    }
}
