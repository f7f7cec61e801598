//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body)
//! 2. Delegates to a service with the repositories from [`AppState`]
//! 3. Returns HTTP response (JSON, status code)

/// Service health endpoint
pub mod health;
/// Transaction endpoints
pub mod transactions;

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::repositories::{CategoriesRepository, TransactionsRepository};

/// Repositories and settings shared with every handler via State extraction.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoriesRepository>,
    pub transactions: Arc<dyn TransactionsRepository>,
    /// Only files directly inside this directory can be imported
    pub import_dir: PathBuf,
}

impl AppState {
    /// Build state from a single store implementing both repositories.
    pub fn from_store<S>(store: Arc<S>, import_dir: impl Into<PathBuf>) -> Self
    where
        S: CategoriesRepository + TransactionsRepository + 'static,
    {
        Self {
            categories: store.clone(),
            transactions: store,
            import_dir: import_dir.into(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/transactions",
            post(transactions::create_transaction).get(transactions::list_transactions),
        )
        .route(
            "/transactions/import",
            post(transactions::import_transactions),
        )
        // Request/response spans, logged at debug level under `tower_http`
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
