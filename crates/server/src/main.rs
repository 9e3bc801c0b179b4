use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info};

use reelmerge_core::{
    load_config, validate_config, validate_storage_config, FfmpegRunner, HttpFetcher,
    MergePipeline, S3ObjectStore, SanitizedConfig, TempDirWorkspaces,
};
use reelmerge_server::api::create_router;
use reelmerge_server::shutdown::shutdown_signal;
use reelmerge_server::state::AppState;
use reelmerge_server::telemetry::init_tracing;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names an optional TOML config file
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
    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No config file set, using defaults and environment"),
    }

    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    validate_storage_config(&config).context("Storage configuration is incomplete")?;

    let sanitized = SanitizedConfig::from(&config);
    let config_json = serde_json::to_string(&sanitized).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        bucket = %config.storage.bucket,
        ffmpeg = ?config.merger.ffmpeg_path,
        "Configuration loaded successfully"
    );

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher).context("Failed to create fetcher")?);
    let workspaces = Arc::new(TempDirWorkspaces::new(&config.workspace));
    let runner = Arc::new(FfmpegRunner::new(config.merger.clone()));
    let store = Arc::new(
        S3ObjectStore::new(&config.storage)
            .await
            .context("Failed to create object store client")?,
    );
    info!("Object store initialized for bucket {}", store.bucket());

    let pipeline = Arc::new(MergePipeline::new(fetcher, workspaces, runner, store));
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting merge service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}
