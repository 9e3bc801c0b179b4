use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use reelmerge_core::{load_config, validate_config, FfmpegRunner};
use reelmerge_server::api::create_probe_router;
use reelmerge_server::shutdown::shutdown_signal;
use reelmerge_server::state::ProbeState;
use reelmerge_server::telemetry::init_tracing;

const CONFIG_ENV: &str = "REELMERGE_CONFIG";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_tracing();

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    let runner = Arc::new(FfmpegRunner::new(config.merger.clone()));
    let app = create_probe_router(Arc::new(ProbeState::new(runner)));

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting probe service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
