//! Application entry point for the `trafficflow` backend service.
//!
//! This binary orchestrates the startup sequence for the foot-traffic
//! analytics pipeline, including:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Dispatching one of three modes:
//!   - `generate` – synthesize the monthly raw CSV files
//!   - `run` (default) – execute the batch pipeline and persist the table
//!   - `serve` – bind the Axum query API over the persisted table
//!
//! # Environment Variables
//! - `RAW_DATA_DIR` (optional) – raw CSV directory (default: `data/raw`)
//! - `FILTERED_PATH` (optional) – persisted Parquet path
//! - `TRAFFIC_API_PORT` (optional) – query API port (default: 8080)
//! - `SIM_START_DATE` / `SIM_END_DATE` / `SIM_NOISE_RATE` (optional) –
//!   generation range and injected-fault rate
//! - `TRAFFIC_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `TRAFFIC_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, io::IsTerminal, net::SocketAddr};

use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

use trafficflow::{config, pipeline, routes, simulator, Config};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    match env::args().nth(1).as_deref() {
        Some("generate") => {
            let files = simulator::generate_monthly_reports(&cfg)?;
            tracing::info!("Generated {} raw files", files.len());
        }
        Some("run") | None => {
            let table = pipeline::run(&cfg)?;
            tracing::info!("Pipeline complete: {} daily rows", table.len());
        }
        Some("serve") => serve(cfg).await?,
        Some(other) => {
            anyhow::bail!("Unknown mode '{other}'. Expected: generate | run | serve");
        }
    }

    Ok(())
}

// ---

/// Bind the query API over the persisted table.
async fn serve(cfg: Config) -> Result<()> {
    // ---
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    let app = routes::router(cfg);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `TRAFFIC_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `TRAFFIC_LOG_LEVEL` env var
///
/// This should be called once at application startup before any logging
/// or tracing macros are invoked. It installs the subscriber globally
/// for the lifetime of the process.
fn init_tracing() {
    // ---
    let span_events = match env::var("TRAFFIC_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to TRAFFIC_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("TRAFFIC_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},polars=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
