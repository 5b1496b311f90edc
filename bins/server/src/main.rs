//! Branchbook API Server
//!
//! Main entry point for the branch back-office posting service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use branchbook_api::{AppState, create_router};
use branchbook_core::ledger::GlPostingService;
use branchbook_db::connect_with_pool;
use branchbook_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "branchbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let posting = GlPostingService::from_config(&config.posting, &config.fees)
        .context("Invalid posting configuration")?;
    info!(
        tolerance = %config.posting.balance_tolerance,
        fee_overrides = config.fees.len(),
        "Posting rules loaded"
    );

    let state = AppState {
        db: Arc::new(db),
        posting: Arc::new(posting),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
