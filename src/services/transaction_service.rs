//! Transaction service - creating single transactions and reporting the balance.
//!
//! This service handles:
//! - Transaction type validation
//! - Balance validation for outcomes
//! - Category lookup and lazy creation
//!
//! # Consistency
//!
//! The category lookup and creation are two separate repository calls with
//! no lock in between. Two concurrent requests naming the same new category
//! may both create it.

use serde::Serialize;

use crate::{
    error::AppError,
    models::transaction::{
        Balance, CreateTransactionRequest, NewTransaction, Transaction, TransactionType,
    },
    repositories::{CategoriesRepository, TransactionsRepository},
};

/// Create one transaction, creating its category when it does not exist yet.
///
/// # Process
///
/// 1. Validate type and value
/// 2. Reject outcomes larger than the current balance
/// 3. Resolve the category by exact title, creating it if absent
/// 4. Persist the transaction
///
/// # Arguments
///
/// * `categories` - Category storage
/// * `transactions` - Transaction storage
/// * `request` - Title, value in cents, type literal and category title
///
/// # Errors
///
/// - `InvalidTransactionType`: type is not `income` or `outcome`
/// - `InvalidRequest`: value is negative
/// - `InsufficientBalance`: outcome exceeds the current balance
/// - `BalanceOverflow`: value would overflow the income or outcome total
/// - `Database`: storage error occurred
///
/// Nothing is written when validation fails.
pub async fn create_transaction(
    categories: &dyn CategoriesRepository,
    transactions: &dyn TransactionsRepository,
    request: CreateTransactionRequest,
) -> Result<Transaction, AppError> {
    let transaction_type: TransactionType = request.transaction_type.parse()?;

    if request.value_cents < 0 {
        return Err(AppError::InvalidRequest(
            "Value must not be negative".to_string(),
        ));
    }

    let balance = transactions.get_balance().await?;
    if transaction_type == TransactionType::Outcome && request.value_cents > balance.total {
        return Err(AppError::InsufficientBalance);
    }

    // Totals must stay representable once this transaction is stored
    balance.with(transaction_type, request.value_cents)?;

    let category = match categories.find_by_title(&request.category).await? {
        Some(existing) => existing,
        None => {
            let created = categories
                .insert_categories(std::slice::from_ref(&request.category))
                .await?;
            let category = created.into_iter().next().ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "Category '{}' could not be created",
                    request.category
                ))
            })?;
            tracing::info!("Created category {} ({})", category.title, category.id);
            category
        }
    };

    let new_transaction = NewTransaction {
        title: request.title,
        transaction_type,
        value_cents: request.value_cents,
        category,
    };

    let transaction = transactions
        .insert_transactions(vec![new_transaction])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::InvalidRequest("Transaction was not stored".to_string()))?;

    tracing::info!(
        "Created {} transaction {} for {} cents",
        transaction.transaction_type,
        transaction.id,
        transaction.value_cents
    );

    Ok(transaction)
}

/// Every stored transaction plus the balance over them.
#[derive(Debug, Serialize)]
pub struct TransactionsOverview {
    pub transactions: Vec<Transaction>,
    pub balance: Balance,
}

/// List all transactions, oldest first, with the current balance.
pub async fn list_transactions(
    transactions: &dyn TransactionsRepository,
) -> Result<TransactionsOverview, AppError> {
    let list = transactions.list().await?;
    let balance = transactions.get_balance().await?;

    Ok(TransactionsOverview {
        transactions: list,
        balance,
    })
}
