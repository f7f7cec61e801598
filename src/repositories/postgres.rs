//! PostgreSQL-backed repositories.
//!
//! Every operation is a single query. Batched writes build one multi-row
//! `INSERT ... VALUES` statement with [`sqlx::QueryBuilder`] instead of
//! issuing one query per row.
//!
//! Rows of one batch share a `created_at`, so reads order by the `seq`
//! column of each table, which PostgreSQL fills in `VALUES` order.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        category::Category,
        transaction::{Balance, NewTransaction, Transaction},
    },
    repositories::{CategoriesRepository, TransactionsRepository},
};

/// Repository implementation over a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Row shape of `transactions` joined with `categories`.
#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    title: String,
    transaction_type: String,
    value_cents: i64,
    created_at: DateTime<Utc>,
    category_id: Uuid,
    category_title: String,
    category_created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            transaction_type: row.transaction_type.parse()?,
            value_cents: row.value_cents,
            category: Category {
                id: row.category_id,
                title: row.category_title,
                created_at: row.category_created_at,
            },
            created_at: row.created_at,
        })
    }
}

#[async_trait::async_trait]
impl CategoriesRepository for PgStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, title, created_at FROM categories WHERE title = $1 ORDER BY seq LIMIT 1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>, AppError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, title, created_at FROM categories WHERE title = ANY($1) ORDER BY seq",
        )
        .bind(titles)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn insert_categories(&self, titles: &[String]) -> Result<Vec<Category>, AppError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        // Ids and timestamps are assigned here so the returned order is the
        // input order regardless of how the database orders RETURNING rows.
        let categories: Vec<Category> = titles.iter().map(Category::new).collect();

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO categories (id, title, created_at) ");
        builder.push_values(&categories, |mut row, category| {
            row.push_bind(category.id)
                .push_bind(&category.title)
                .push_bind(category.created_at);
        });
        builder.build().execute(&self.pool).await?;

        Ok(categories)
    }
}

#[async_trait::async_trait]
impl TransactionsRepository for PgStore {
    async fn get_balance(&self) -> Result<Balance, AppError> {
        // Sums come back as text: SUM over BIGINT is NUMERIC and may not fit in an i64
        let (income, outcome): (String, String) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(value_cents) FILTER (WHERE type = 'income'), 0)::TEXT,
                COALESCE(SUM(value_cents) FILTER (WHERE type = 'outcome'), 0)::TEXT
            FROM transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let to_cents = |sum: &str| sum.parse::<i64>().map_err(|_| AppError::BalanceOverflow);
        Balance::new(to_cents(&income)?, to_cents(&outcome)?)
    }

    async fn insert_transactions(
        &self,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, AppError> {
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let created: Vec<Transaction> = transactions
            .into_iter()
            .map(|t| t.into_transaction(Uuid::new_v4(), now))
            .collect();

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO transactions (id, title, type, value_cents, category_id, created_at) ",
        );
        builder.push_values(&created, |mut row, t| {
            row.push_bind(t.id)
                .push_bind(&t.title)
                .push_bind(t.transaction_type.as_str())
                .push_bind(t.value_cents)
                .push_bind(t.category.id)
                .push_bind(t.created_at);
        });
        builder.build().execute(&self.pool).await?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                t.id,
                t.title,
                t.type AS transaction_type,
                t.value_cents,
                t.created_at,
                c.id AS category_id,
                c.title AS category_title,
                c.created_at AS category_created_at
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            ORDER BY t.seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
