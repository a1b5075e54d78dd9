//! # pageshelld — pageshell daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`pageshell.toml`, env vars)
//! - Initialize logging
//! - Load the glyph catalog partition table
//! - Open the `SQLite` icon store and run migrations
//! - Construct the icon cache, injecting the store and the remote chunk fetcher
//! - Build the axum router and serve until SIGINT, flushing pending icon writes
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod catalog;
mod config;

use pageshell_adapter_http_axum::state::AppState;
use pageshell_adapter_http_reqwest::HttpChunkFetcher;
use pageshell_adapter_storage_sqlite_sqlx::{Config as DatabaseConfig, SqliteIconStore};
use pageshell_app::services::icon_cache::IconCache;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Catalog
    let table = catalog::load_chunk_table(&config.icons.metadata_path)?;
    tracing::info!(version = %table.version, parts = table.parts.len(), "glyph catalog loaded");

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let store = SqliteIconStore::new(db.pool().clone());

    // Services
    let fetcher = HttpChunkFetcher::new(&config.icons.upstream_url)?;
    let icons = IconCache::new(store, fetcher, table, config.icon_cache())?;
    if let Err(err) = icons.init().await {
        tracing::warn!(error = %err, "icon store version check failed, will retry on first lookup");
    }

    // HTTP
    let mut state = AppState::new(icons.clone());
    if let Some(dir) = &config.icons.catalog_dir {
        state = state.with_catalog_dir(dir.clone());
    }
    let app = pageshell_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "pageshelld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    icons.flush().await;
    tracing::info!("pageshelld stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
