// =============================================================================
// signal-scope — Main Entry Point
// =============================================================================
//
// Loads the runtime config, wires the file-backed dataset provider into the
// shared state and serves the analysis API until Ctrl+C.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use signal_scope::api;
use signal_scope::app_state::AppState;
use signal_scope::market_data::FileDatasetProvider;
use signal_scope::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("SIGNAL_SCOPE_CONFIG")
        .unwrap_or_else(|_| "signal_scope_config.json".into());

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("SIGNAL_SCOPE_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(dir) = std::env::var("SIGNAL_SCOPE_DATA_DIR") {
        config.data_dir = dir.into();
    }

    info!(
        bind_addr = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        short_window = config.scoring.short_window,
        long_window = config.scoring.long_window,
        "signal-scope starting"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let provider = Arc::new(FileDatasetProvider::new(config.data_dir.clone()));
    if !provider.root().is_dir() {
        warn!(data_dir = %provider.root().display(), "data directory does not exist yet");
    }
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, provider));

    // ── 3. Serve the API ─────────────────────────────────────────────────
    let app = api::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    // ── 4. Persist defaults changed through the API ──────────────────────
    if let Err(e) = state.runtime_config.read().save(&config_path) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("signal-scope shut down complete.");
    Ok(())
}
