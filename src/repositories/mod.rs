//! Persistence abstractions.
//!
//! Services never talk to a database directly. They receive the repositories
//! they need as trait objects, so the same business logic runs against
//! PostgreSQL in production and against [`memory::MemoryStore`] in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        category::Category,
        transaction::{Balance, NewTransaction, Transaction},
    },
};

/// Lookup and creation of categories.
#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    /// Find the oldest category whose title matches exactly.
    async fn find_by_title(&self, title: &str) -> Result<Option<Category>, AppError>;

    /// Find every category whose title is in `titles`, in one round trip.
    ///
    /// Results are in insertion order, oldest first.
    async fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>, AppError>;

    /// Create one category per title, in one round trip.
    ///
    /// Returns the created categories in the same order as `titles`.
    async fn insert_categories(&self, titles: &[String]) -> Result<Vec<Category>, AppError>;
}

/// Persistence and aggregation of transactions.
#[async_trait]
pub trait TransactionsRepository: Send + Sync {
    /// Income, outcome and total over all stored transactions.
    async fn get_balance(&self) -> Result<Balance, AppError>;

    /// Persist transactions in one round trip.
    ///
    /// Returns the stored transactions in the same order as the input.
    async fn insert_transactions(
        &self,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, AppError>;

    /// All stored transactions in insertion order.
    ///
    /// Rows saved by one `insert_transactions` call come back in the order
    /// they were passed, after every row saved by earlier calls.
    async fn list(&self) -> Result<Vec<Transaction>, AppError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
