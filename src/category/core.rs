//! The category model and its database queries.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId, transaction_type::TransactionType};

/// A category for expenses or income, e.g. 'Food', 'Transport', 'Salary'.
///
/// Categories are shared by all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// A CSS hex colour used when charting the category, e.g. "#FF5733".
    pub color: String,
    /// Whether the category files income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// The fields needed to create a [Category].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCategory<'a> {
    /// The display name of the category.
    pub name: &'a str,
    /// A CSS hex colour used when charting the category.
    pub color: &'a str,
    /// Whether the category files income or expenses.
    pub transaction_type: TransactionType,
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns an [Error::SqlError] if the category already exists or there is some other SQL error.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, color, type) VALUES (?1, ?2, ?3)
             RETURNING id, name, color, type",
        )?
        .query_row(
            (category.name, category.color, category.transaction_type),
            map_category_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, type FROM category ORDER BY name ASC, type ASC;")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the category with `id` if it files transactions of `transaction_type`.
///
/// # Errors
/// Returns an [Error::InvalidCategory] if there is no category with `id` or it
/// has a different type, or an [Error::SqlError] if there is some other SQL error.
pub fn get_category_of_type(
    id: CategoryId,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, type FROM category WHERE id = ?1 AND type = ?2;")?
        .query_row((id, transaction_type), map_category_row)
        .optional()?
        .ok_or(Error::InvalidCategory)
}

/// Find the category with the given name and type, if it exists.
pub fn find_category(
    name: &str,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, type FROM category WHERE name = ?1 AND type = ?2;")?
        .query_row((name, transaction_type), map_category_row)
        .optional()
        .map_err(|error| error.into())
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
            UNIQUE(name, type)
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

/// Map a database row to a [Category].
fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        transaction_type: row.get(3)?,
    })
}
