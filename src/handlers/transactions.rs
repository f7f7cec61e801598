//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - POST /transactions - Create one transaction
//! - GET /transactions - List transactions with the current balance
//! - POST /transactions/import - Import a CSV file from the import directory

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    error::AppError,
    handlers::AppState,
    models::transaction::{CreateTransactionRequest, Transaction},
    services::{
        import_service,
        transaction_service::{self, TransactionsOverview},
    },
};

/// Create a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Rent",
///   "value_cents": 100000,
///   "type": "outcome",
///   "category": "Housing"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the stored transaction with its category
/// - **Error (400)**: bad type, negative value or insufficient balance
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = transaction_service::create_transaction(
        state.categories.as_ref(),
        state.transactions.as_ref(),
        request,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// List all transactions.
///
/// # Response (200)
///
/// ```json
/// {
///   "transactions": [ ... ],
///   "balance": { "income": 500000, "outcome": 100000, "total": 400000 }
/// }
/// ```
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<TransactionsOverview>, AppError> {
    let overview = transaction_service::list_transactions(state.transactions.as_ref()).await?;
    Ok(Json(overview))
}

/// Request to import a CSV file placed in the configured import directory.
///
/// # JSON Example
///
/// ```json
/// { "file_name": "statement.csv" }
/// ```
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Bare file name; paths and `..` are rejected
    pub file_name: String,
}

/// Import transactions from a CSV file.
///
/// The file is deleted once its transactions are stored.
///
/// # Response
///
/// - **Success (201 Created)**: the stored transactions in file order
/// - **Error (400)**: name outside the import directory, missing file, bad CSV or bad row
pub async fn import_transactions(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), AppError> {
    let path = import_service::resolve_import_path(&state.import_dir, &request.file_name).await?;

    let transactions = import_service::import_transactions(
        state.categories.as_ref(),
        state.transactions.as_ref(),
        &path,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(transactions)))
}
