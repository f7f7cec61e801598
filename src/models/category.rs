//! Category model.
//!
//! Categories are named labels attached to transactions. They are created
//! lazily the first time a transaction references a title and never change
//! afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a category record.
///
/// # Database Table
///
/// Maps to the `categories` table. Titles are unique by convention only:
/// nothing in the schema prevents two rows with the same title.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Category {
    /// Unique identifier for this category
    pub id: Uuid,

    /// Human-readable label, matched exactly when resolving transactions
    pub title: String,

    /// Timestamp when category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Build a fresh category that has not been persisted yet.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}
