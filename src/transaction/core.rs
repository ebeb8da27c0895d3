//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    calendar::DateTimeRange,
    database_id::{CategoryId, TransactionId},
    money::Amount,
    transaction_type::TransactionType,
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// The ID of the category the transaction is filed under.
    pub category_id: CategoryId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always positive.
    pub amount: Amount,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Display details of the category the transaction is filed under.
    pub category: TransactionCategory,
}

/// The category details embedded in a [Transaction].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCategory {
    /// The display name of the category.
    pub name: String,
    /// A CSS hex colour used when charting the category.
    pub color: String,
    /// Whether the category files income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserId,
        transaction_type: TransactionType,
        category_id: CategoryId,
        amount: Amount,
        date: OffsetDateTime,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            category_id,
            description: String::new(),
            amount,
            date,
            transaction_type,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Validation of the amount, description and category is done by the caller
/// before the builder is passed to [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// The category the transaction is filed under.
    ///
    /// The category's type should match `transaction_type`.
    pub category_id: CategoryId,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The amount of money spent or earned, always positive.
    pub amount: Amount,
    /// When the transaction happened.
    ///
    /// Sub-second precision is dropped when the transaction is stored.
    pub date: OffsetDateTime,
    /// Whether money was spent or earned.
    pub transaction_type: TransactionType,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }
}

/// Optional conditions for narrowing down a listing of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions that happened within this range.
    pub date_range: Option<DateTimeRange>,
    /// Only include income or only include expenses.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions filed under this category.
    pub category_id: Option<CategoryId>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION_WITH_CATEGORY: &str = "SELECT
        t.id, t.user_id, t.category_id, t.description, t.amount, t.date, t.type,
        c.name, c.color, c.type
    FROM \"transaction\" t
    INNER JOIN category c ON c.id = t.category_id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .execute(
            "INSERT INTO \"transaction\" (user_id, category_id, description, amount, date, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                builder.user_id.as_str(),
                builder.category_id,
                &builder.description,
                builder.amount,
                builder.date.unix_timestamp(),
                builder.transaction_type,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory,
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    get_transaction(id, &builder.user_id, connection)
}

/// Retrieve one of `user_id`'s transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let query = format!("{SELECT_TRANSACTION_WITH_CATEGORY} WHERE t.id = ?1 AND t.user_id = ?2");

    connection
        .prepare(&query)?
        .query_row((id, user_id.as_str()), map_transaction_row)
        .map_err(|error| error.into())
}

/// Get `user_id`'s transactions matching `filter`, most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or a row cannot
/// be mapped.
pub fn get_transactions(
    user_id: &UserId,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions = vec!["t.user_id = ?"];
    let mut params = vec![Value::Text(user_id.as_str().to_owned())];

    if let Some(date_range) = &filter.date_range {
        conditions.push("t.date BETWEEN ? AND ?");
        params.push(Value::Integer(date_range.start().unix_timestamp()));
        params.push(Value::Integer(date_range.end().unix_timestamp()));
    }

    if let Some(transaction_type) = filter.transaction_type {
        conditions.push("t.type = ?");
        params.push(Value::Text(transaction_type.as_str().to_owned()));
    }

    if let Some(category_id) = filter.category_id {
        conditions.push("t.category_id = ?");
        params.push(Value::Integer(category_id));
    }

    // Sort by date, and then ID to keep the order stable for same-day transactions
    let query = format!(
        "{SELECT_TRANSACTION_WITH_CATEGORY} WHERE {} ORDER BY t.date DESC, t.id DESC",
        conditions.join(" AND ")
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

/// Delete one of `user_id`'s transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_str()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// Amounts are stored as integer cents and dates as UTC unix timestamps in
/// seconds.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                date INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    // Composite index used by the listing, summary and history queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Convert a unix timestamp column into a UTC date-time.
pub fn map_timestamp(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let timestamp: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp(timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Integer,
            Box::new(error),
        )
    })
}

/// Map a database row to a Transaction.
///
/// Expects the columns of `SELECT_TRANSACTION_WITH_CATEGORY`.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserId::new(row.get::<_, String>(1)?),
        category_id: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        date: map_timestamp(row, 5)?,
        transaction_type: row.get(6)?,
        category: TransactionCategory {
            name: row.get(7)?,
            color: row.get(8)?,
            transaction_type: row.get(9)?,
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================
