mod config;
mod db;
mod errors;
mod models;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::screening::scoring::HeuristicScorer;
use crate::screening::store::SubmissionStore;
use crate::screening::upload::UploadDir;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid or missing production values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));
    if config.uses_dev_secret() {
        warn!("APP_SECRET not set, signing cookies with the insecure development secret");
    }
    info!(
        "Accepting {} uploads up to {} bytes",
        config.allowed_extensions_label(),
        config.max_upload_bytes
    );

    // Initialize SQLite and apply migrations
    let db = create_pool(&config.database_url).await?;

    let uploads = UploadDir::new(&config.upload_dir);
    uploads
        .ensure_exists()
        .await
        .with_context(|| format!("Cannot create upload dir {}", config.upload_dir.display()))?;

    let state = AppState {
        store: SubmissionStore::new(db),
        uploads,
        scorer: Arc::new(HeuristicScorer),
        cookie_key: Key::derive_from(config.secret.as_bytes()),
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
