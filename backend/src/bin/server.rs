//! Exoplanet backend HTTP server binary.
//!
//! # Usage
//!
//! ```bash
//! # Local archive under ./data/lightcurves (default)
//! cargo run --bin exo-server
//!
//! # Remote archive
//! ARCHIVE_URL=https://archive.example.org/api cargo run --bin exo-server
//!
//! # Configuration file
//! EXO_CONFIG=exo.toml cargo run --bin exo-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `CORS_ORIGINS`: Comma-separated allowed origins (default: the local dev servers)
//! - `ARCHIVE_TYPE`, `ARCHIVE_URL`, `ARCHIVE_ROOT`, `EXO_CACHE_DIR`, `ARCHIVE_TIMEOUT_SECS`:
//!   archive selection, see [`exo_backend::config::AppConfig::from_env`]
//! - `EXO_CONFIG`: TOML configuration file used instead of the variables above
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use exo_backend::archive::ArchiveFactory;
use exo_backend::config::AppConfig;
use exo_backend::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting exoplanet backend");

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!(e))?;
    let addr = config.server.bind_addr().map_err(|e| anyhow::anyhow!(e))?;

    let archive = ArchiveFactory::create(&config.archive)?;
    info!(archive = archive.name(), "Archive initialized");

    let app = create_router(AppState::new(archive, config));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
