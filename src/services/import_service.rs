//! Import service - bulk creation of transactions from a CSV file.
//!
//! The file has a header row followed by rows of `title, type, value, category`.
//! Reconciliation of categories is batched: one lookup for every title in the
//! file and one insert for the titles that do not exist yet.
//!
//! # Failure Semantics
//!
//! There is no rollback. If persisting the transactions fails, categories
//! created earlier in the same import stay committed and the source file is
//! left in place.

use std::{
    collections::{HashMap, HashSet},
    io::Read,
    path::{Component, Path, PathBuf},
};

use crate::{
    error::AppError,
    models::{
        category::Category,
        transaction::{NewTransaction, Transaction, TransactionType, parse_value_cents},
    },
    repositories::{CategoriesRepository, TransactionsRepository},
};

/// A parsed row, with every cell trimmed but not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub title: String,
    pub transaction_type: String,
    pub value: String,
    pub category: String,
}

/// Everything collected from one pass over the file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedImport {
    /// Kept rows, in file order
    pub drafts: Vec<TransactionDraft>,
    /// Category title of every kept row, duplicates included
    pub category_titles: Vec<String>,
}

/// Number of columns every import file has: title, type, value, category.
const IMPORT_COLUMNS: usize = 4;

/// Resolve a client-supplied file name inside `import_dir`.
///
/// Only a bare file name is accepted. The file must exist and its canonical
/// path must still lie under `import_dir`, so symlinks cannot escape it.
pub async fn resolve_import_path(import_dir: &Path, file_name: &str) -> Result<PathBuf, AppError> {
    let rejected = || AppError::InvalidRequest(format!("Invalid import file name '{}'", file_name));

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(rejected()),
    }

    let dir = tokio::fs::canonicalize(import_dir).await?;
    let path = tokio::fs::canonicalize(dir.join(file_name))
        .await
        .map_err(|_| AppError::InvalidRequest(format!("Import file '{}' not found", file_name)))?;

    if !path.starts_with(&dir) || !tokio::fs::metadata(&path).await?.is_file() {
        return Err(rejected());
    }

    Ok(path)
}

/// Read CSV rows from `reader`, skipping the header.
///
/// The header must have exactly four columns.
/// Rows with an empty title, type or value are dropped without error.
/// Rows whose column count differs from the header fail the whole parse.
pub fn parse_transactions<R: Read>(reader: R) -> Result<ParsedImport, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = csv_reader.headers()?.len();
    if columns != IMPORT_COLUMNS {
        return Err(AppError::InvalidRequest(format!(
            "Expected {} columns (title, type, value, category), found {}",
            IMPORT_COLUMNS, columns
        )));
    }

    let mut parsed = ParsedImport::default();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();

        let draft = TransactionDraft {
            title: cell(0),
            transaction_type: cell(1),
            value: cell(2),
            category: cell(3),
        };

        if draft.title.is_empty() || draft.transaction_type.is_empty() || draft.value.is_empty() {
            // Header is line 1, first record is line 2
            tracing::debug!("Skipping incomplete row on line {}", index + 2);
            continue;
        }

        parsed.category_titles.push(draft.category.clone());
        parsed.drafts.push(draft);
    }

    Ok(parsed)
}

/// Parse the file at `path` on the blocking thread pool.
///
/// Resolves only once the whole file has been consumed.
async fn parse_file(path: PathBuf) -> Result<ParsedImport, AppError> {
    tokio::task::spawn_blocking(move || -> Result<ParsedImport, AppError> {
        let file = std::fs::File::open(&path)?;
        parse_transactions(std::io::BufReader::new(file))
    })
    .await?
}

/// Titles that need a new category: not already stored, first occurrence only.
fn titles_to_create(candidates: &[String], existing: &[Category]) -> Vec<String> {
    let existing_titles: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    let mut seen = HashSet::new();

    candidates
        .iter()
        .filter(|&title| !existing_titles.contains(title.as_str()))
        .filter(|&title| seen.insert(title.as_str()))
        .cloned()
        .collect()
}

/// Import every transaction in the CSV file at `file_path`, then delete the file.
///
/// # Process
///
/// 1. Parse the whole file (header skipped, incomplete rows dropped)
/// 2. Look up all referenced categories in one query
/// 3. Create the missing ones in one insert
/// 4. Resolve each row's category by exact title and validate type and value
/// 5. Check the balance totals stay representable
/// 6. Persist all transactions in one insert
/// 7. Delete the source file
///
/// # Returns
///
/// The stored transactions in file order.
///
/// # Errors
///
/// - `Io`: file cannot be opened or deleted
/// - `Csv`: file is not valid CSV
/// - `InvalidRequest`: wrong column count in the header
/// - `InvalidTransactionType` / `InvalidRequest`: a kept row has a bad type or value
/// - `BalanceOverflow`: the values would overflow the balance totals
/// - `Database`: storage error occurred
pub async fn import_transactions(
    categories: &dyn CategoriesRepository,
    transactions: &dyn TransactionsRepository,
    file_path: &Path,
) -> Result<Vec<Transaction>, AppError> {
    let parsed = parse_file(file_path.to_path_buf()).await?;

    let existing = categories.find_by_titles(&parsed.category_titles).await?;
    let missing = titles_to_create(&parsed.category_titles, &existing);
    let created = categories.insert_categories(&missing).await?;

    if !created.is_empty() {
        tracing::info!("Created {} categories during import", created.len());
    }

    // New categories first, so they win over duplicates already stored
    let mut by_title: HashMap<&str, &Category> = HashMap::new();
    for category in created.iter().chain(existing.iter()) {
        by_title.entry(category.title.as_str()).or_insert(category);
    }

    let new_transactions = parsed
        .drafts
        .into_iter()
        .map(|draft| -> Result<NewTransaction, AppError> {
            let category = by_title
                .get(draft.category.as_str())
                .map(|c| (*c).clone())
                .ok_or_else(|| {
                    AppError::InvalidRequest(format!("Unknown category '{}'", draft.category))
                })?;

            Ok(NewTransaction {
                transaction_type: draft.transaction_type.parse::<TransactionType>()?,
                value_cents: parse_value_cents(&draft.value)?,
                title: draft.title,
                category,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Imports skip the balance check but must keep the totals representable
    let balance = transactions.get_balance().await?;
    new_transactions
        .iter()
        .try_fold(balance, |b, t| b.with(t.transaction_type, t.value_cents))?;

    let stored = transactions.insert_transactions(new_transactions).await?;

    tokio::fs::remove_file(file_path).await?;

    tracing::info!(
        "Imported {} transactions from {}",
        stored.len(),
        file_path.display()
    );

    Ok(stored)
}
