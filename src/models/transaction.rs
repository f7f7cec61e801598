//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: persisted income or outcome record
//! - `TransactionType`: direction of the money movement
//! - `NewTransaction`: a transaction ready to be persisted
//! - `CreateTransactionRequest`: request body for creating one transaction
//! - `Balance`: income/outcome totals

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::category::Category};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Outcome,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the exact lowercase literals `income` and `outcome`.
impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            _ => Err(AppError::InvalidTransactionType),
        }
    }
}

/// Represents a persisted transaction with its resolved category.
///
/// # Database Table
///
/// Maps to the `transactions` table joined with `categories`. Values are
/// stored in cents (never floats!) and are never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: Uuid,

    /// Human-readable description
    pub title: String,

    /// Income or outcome
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Amount in cents
    pub value_cents: i64,

    /// Category this transaction belongs to
    pub category: Category,

    /// When transaction was created
    pub created_at: DateTime<Utc>,
}

/// A transaction that has been validated but not persisted yet.
///
/// Repositories assign `id` and `created_at` when saving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub title: String,
    pub transaction_type: TransactionType,
    pub value_cents: i64,
    pub category: Category,
}

impl NewTransaction {
    /// Attach storage-assigned identity to this transaction.
    pub fn into_transaction(self, id: Uuid, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            title: self.title,
            transaction_type: self.transaction_type,
            value_cents: self.value_cents,
            category: self.category,
            created_at,
        }
    }
}

/// Request to create a single transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "title": "Salary",
///   "value_cents": 500000,
///   "type": "income",
///   "category": "Job"
/// }
/// ```
///
/// # Validation
///
/// - `type`: must be exactly `income` or `outcome`. Kept as a string so an
///   unknown literal is reported as a validation error instead of a
///   deserialization failure.
/// - `value_cents`: must not be negative
/// - `outcome` values cannot exceed the current balance
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    pub title: String,

    pub value_cents: i64,

    #[serde(rename = "type")]
    pub transaction_type: String,

    /// Category title, created if it does not exist yet
    pub category: String,
}

/// Totals over every persisted transaction, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub income: i64,
    pub outcome: i64,
    pub total: i64,
}

impl Balance {
    /// Build totals, failing if `income - outcome` does not fit in an `i64`.
    pub fn new(income: i64, outcome: i64) -> Result<Self, AppError> {
        let total = income
            .checked_sub(outcome)
            .ok_or(AppError::BalanceOverflow)?;

        Ok(Self {
            income,
            outcome,
            total,
        })
    }

    /// Totals after adding one more transaction.
    ///
    /// Fails with `BalanceOverflow` when the income or outcome sum would no
    /// longer fit in an `i64`.
    pub fn with(self, transaction_type: TransactionType, value_cents: i64) -> Result<Self, AppError> {
        match transaction_type {
            TransactionType::Income => {
                let income = self
                    .income
                    .checked_add(value_cents)
                    .ok_or(AppError::BalanceOverflow)?;
                Self::new(income, self.outcome)
            }
            TransactionType::Outcome => {
                let outcome = self
                    .outcome
                    .checked_add(value_cents)
                    .ok_or(AppError::BalanceOverflow)?;
                Self::new(self.income, outcome)
            }
        }
    }

    /// Compute totals from a list of transactions.
    pub fn from_transactions<'a, I>(transactions: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .try_fold(Self::default(), |balance, t| {
                balance.with(t.transaction_type, t.value_cents)
            })
    }
}

/// Parse a textual amount into cents.
///
/// Accepts formats: "5000", "10.5", "10.50", "$10.50". Digits past the
/// second decimal place are truncated. Signs and anything non-numeric are
/// rejected.
pub fn parse_value_cents(s: &str) -> Result<i64, AppError> {
    let invalid = || AppError::InvalidRequest(format!("Invalid value '{}'", s));

    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;

    // Pad or truncate to exactly two digits
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction[..2].parse().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_literals() {
        assert_eq!(
            "income".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            "outcome".parse::<TransactionType>().unwrap(),
            TransactionType::Outcome
        );
    }

    #[test]
    fn rejects_other_type_literals() {
        for literal in ["", "Income", "OUTCOME", "transfer", " income"] {
            assert!(matches!(
                literal.parse::<TransactionType>(),
                Err(AppError::InvalidTransactionType)
            ));
        }
    }

    #[test]
    fn parses_values() {
        assert_eq!(parse_value_cents("5000").unwrap(), 500_000);
        assert_eq!(parse_value_cents("10.5").unwrap(), 1050);
        assert_eq!(parse_value_cents("10.50").unwrap(), 1050);
        assert_eq!(parse_value_cents("$10.50").unwrap(), 1050);
        assert_eq!(parse_value_cents("0.999").unwrap(), 99);
        assert_eq!(parse_value_cents("7.").unwrap(), 700);
    }

    #[test]
    fn rejects_invalid_values() {
        for value in ["", "abc", "-5", "1.2.3", ".50", "1,000", "99999999999999999999"] {
            assert!(
                parse_value_cents(value).is_err(),
                "expected '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn balance_sums_by_direction() {
        let category = Category::new("Job");
        let make = |transaction_type, value_cents| {
            NewTransaction {
                title: "t".to_string(),
                transaction_type,
                value_cents,
                category: category.clone(),
            }
            .into_transaction(Uuid::new_v4(), Utc::now())
        };
        let transactions = vec![
            make(TransactionType::Income, 5000),
            make(TransactionType::Outcome, 1500),
            make(TransactionType::Income, 200),
        ];

        let balance = Balance::from_transactions(&transactions).unwrap();
        assert_eq!(balance, Balance::new(5200, 1500).unwrap());
        assert_eq!(balance.total, 3700);
    }

    #[test]
    fn balance_overflow_is_an_error() {
        let full = Balance::new(i64::MAX, 0).unwrap();

        assert!(matches!(
            full.with(TransactionType::Income, 1),
            Err(AppError::BalanceOverflow)
        ));
        assert_eq!(
            full.with(TransactionType::Outcome, i64::MAX).unwrap().total,
            0
        );
        assert!(matches!(
            Balance::new(-2, i64::MAX),
            Err(AppError::BalanceOverflow)
        ));
    }

    #[test]
    fn serializes_type_field() {
        let transaction = NewTransaction {
            title: "Rent".to_string(),
            transaction_type: TransactionType::Outcome,
            value_cents: 100_000,
            category: Category::new("Housing"),
        }
        .into_transaction(Uuid::new_v4(), Utc::now());

        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["type"], "outcome");
        assert_eq!(json["category"]["title"], "Housing");
    }
}
