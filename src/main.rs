//! Finance Tracker - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Connect to PostgreSQL and run migrations, or fall back to in-memory storage
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use std::sync::Arc;

use finance_tracker::{
    config::Config,
    db,
    handlers::{self, AppState},
    repositories::{memory::MemoryStore, postgres::PgStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    tokio::fs::create_dir_all(&config.import_dir).await?;
    tracing::info!("Importing CSV files from {}", config.import_dir.display());

    let state = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            AppState::from_store(Arc::new(PgStore::new(pool)), config.import_dir.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, data will be kept in memory only");
            AppState::from_store(Arc::new(MemoryStore::new()), config.import_dir.clone())
        }
    };

    let app = handlers::router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
