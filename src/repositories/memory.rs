//! In-memory repositories.
//!
//! Vectors behind `tokio::sync::RwLock`, appended to in insertion order.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        category::Category,
        transaction::{Balance, NewTransaction, Transaction},
    },
    repositories::{CategoriesRepository, TransactionsRepository},
};

/// In-memory storage for categories and transactions.
///
/// Used by tests and when no `DATABASE_URL` is configured. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    categories: RwLock<Vec<Category>>,
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored category, in creation order.
    pub async fn categories(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }
}

#[async_trait::async_trait]
impl CategoriesRepository for MemoryStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Category>, AppError> {
        let guard = self.categories.read().await;
        Ok(guard.iter().find(|c| c.title == title).cloned())
    }

    async fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>, AppError> {
        let guard = self.categories.read().await;
        Ok(guard
            .iter()
            .filter(|c| titles.contains(&c.title))
            .cloned()
            .collect())
    }

    async fn insert_categories(&self, titles: &[String]) -> Result<Vec<Category>, AppError> {
        let created: Vec<Category> = titles.iter().map(Category::new).collect();
        let mut guard = self.categories.write().await;
        guard.extend(created.iter().cloned());
        Ok(created)
    }
}

#[async_trait::async_trait]
impl TransactionsRepository for MemoryStore {
    async fn get_balance(&self) -> Result<Balance, AppError> {
        let guard = self.transactions.read().await;
        Balance::from_transactions(guard.iter())
    }

    async fn insert_transactions(
        &self,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, AppError> {
        let now = Utc::now();
        let created: Vec<Transaction> = transactions
            .into_iter()
            .map(|t| t.into_transaction(Uuid::new_v4(), now))
            .collect();

        let mut guard = self.transactions.write().await;
        guard.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.transactions.read().await.clone())
    }
}
