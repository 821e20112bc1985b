//! Relief Engine - decision service for disaster-relief coordination
//!
//! Serves request classification, demand forecasting, volunteer matching and
//! resource allocation over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults (untrained forecaster, port 5001)
//! cargo run --release
//!
//! # Train the forecaster from a history file at startup
//! cargo run --release -- --history data/history.json
//! ```
//!
//! # Environment Variables
//!
//! - `RELIEF_CONFIG`: Path to a TOML config file (default: ./relief_config.toml)
//! - `RELIEF_SERVER_ADDR`: HTTP bind address (overridden by `--addr`)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use relief_engine::api::{create_app, AppState};
use relief_engine::config::{self, EngineConfig};
use relief_engine::forecast::{load_history, DemandForecaster};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "relief-engine")]
#[command(about = "Decision engine for disaster-relief coordination")]
#[command(version)]
struct CliArgs {
    /// HTTP bind address (overrides config and RELIEF_SERVER_ADDR)
    #[arg(long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// TOML config file (overrides RELIEF_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON history to train the forecaster on before serving
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,
}

/// Load history and train. Failures are logged; the service still starts.
fn train_from_history(forecaster: &DemandForecaster, path: &Path) {
    let records = match load_history(path) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Could not load history, starting untrained");
            return;
        }
    };

    match forecaster.train(&records) {
        Ok(summary) => info!(
            rows = summary.total_rows,
            trained = summary.trained_count(),
            "Startup training complete"
        ),
        Err(e) => warn!(error = %e, "Startup training failed, starting untrained"),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let engine_config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::load(),
    };
    config::init(engine_config);
    let cfg = config::get();

    let server_addr = args
        .addr
        .or_else(|| std::env::var("RELIEF_SERVER_ADDR").ok())
        .unwrap_or_else(|| cfg.server.addr.clone());

    info!("Relief Engine v{}", env!("CARGO_PKG_VERSION"));
    info!(
        trees = cfg.forecaster.n_estimators,
        min_rows = cfg.forecaster.min_training_rows,
        clusters = cfg.matcher.max_clusters,
        "Engine configured"
    );

    let forecaster = Arc::new(DemandForecaster::new(cfg.forecaster.clone()));
    if let Some(path) = args.history.or_else(|| cfg.forecaster.history_path.clone()) {
        let trainer = Arc::clone(&forecaster);
        tokio::task::spawn_blocking(move || train_from_history(&trainer, &path))
            .await
            .context("Startup training task panicked")?;
    } else {
        info!("No history configured, forecaster will use default demand until trained");
    }

    let app = create_app(AppState::with_forecaster(cfg, forecaster));

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("HTTP server listening on {}", server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}
