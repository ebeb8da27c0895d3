//! Database start-up: connection settings and the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_api_token_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not exist yet.
///
/// Also enables foreign key enforcement for `connection`, which SQLite leaves
/// off by default.
///
/// # Errors
/// Returns an [Error::SqlError] if a pragma or table creation fails. No table
/// is created in that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_api_token_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
