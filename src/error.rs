//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Every variant carries a message (its `Display` output) and maps to an
/// HTTP status code through [`AppError::status_code`].
///
/// # Error Categories
///
/// - **Validation Errors**: bad transaction type, insufficient balance, invalid values
/// - **Input Errors**: CSV files that cannot be parsed
/// - **Infrastructure Errors**: database, filesystem and blocking task failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading or deleting a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The import file is not valid CSV (e.g. a row with a wrong column count).
    #[error("Invalid CSV file: {0}")]
    Csv(#[from] csv::Error),

    /// A blocking task panicked or was cancelled before finishing.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Transaction type is neither `income` nor `outcome`.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Type should be income or outcome")]
    InvalidTransactionType,

    /// An outcome would push the balance below zero.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Total expenses cannot exceed your incomes.")]
    InsufficientBalance,

    /// A value would push the income or outcome total past what an `i64` holds.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Value would overflow the balance totals")]
    BalanceOverflow,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status code associated with this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidTransactionType
            | AppError::InsufficientBalance
            | AppError::BalanceOverflow
            | AppError::InvalidRequest(_)
            | AppError::Csv(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Io(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidTransactionType => "invalid_transaction_type",
            AppError::InsufficientBalance => "insufficient_balance",
            AppError::BalanceOverflow => "balance_overflow",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Csv(_) => "invalid_csv",
            AppError::Database(_) | AppError::Io(_) | AppError::Task(_) => "internal_error",
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Internal errors are logged and their details hidden from the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
