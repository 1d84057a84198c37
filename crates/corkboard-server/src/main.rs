//! # corkboard-server
//!
//! Message board HTTP server.
//!
//! This binary provides:
//! - **REST API** (axum) for posting messages, reading the recent feed,
//!   reaction counters, and a one-shot remote import
//! - **Static file serving** for the bundled frontend
//! - The dual-backend coordinator: every post is committed to the local
//!   SQLite store, and mirrored to a configured GitHub repository when the
//!   message names one

mod api;
mod config;
mod error;

use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use corkboard_core::{ConfigStore, MessageBoard};
use corkboard_remote::{GithubClient, Mirror};
use corkboard_store::Database;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,corkboard_server=debug")),
        )
        .init();

    info!("Starting corkboard server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // Local store (schema creation is idempotent).
    let database = match &config.db_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };

    // Durable key/value configuration; re-read by the coordinator on every
    // operation so repository changes take effect without restart.
    let config_store = match &config.config_path {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::open_default()?,
    };
    info!(path = %config_store.path().display(), "using configuration store");

    // Remote mirror, only when a credential is configured.
    let mirror: Option<Arc<dyn Mirror>> = match config_store.github_token()? {
        Some(token) => match GithubClient::new(&token) {
            Ok(client) => {
                info!("remote mirror enabled");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "invalid github token, running local-only");
                None
            }
        },
        None => {
            info!("no github token configured, running local-only");
            None
        }
    };

    let board = MessageBoard::new(Arc::new(Mutex::new(database)), mirror, config_store);
    let app_state = AppState {
        board: Arc::new(board),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, &config.static_dir, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
