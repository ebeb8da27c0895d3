//! Database queries for retrieving summary transaction data.
//!
//! The monthly history only needs the amount, date and type of each
//! transaction, so it uses a narrower view than [crate::transaction::Transaction].

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error, calendar::DateTimeRange, money::Amount, transaction::map_timestamp,
    transaction_type::TransactionType, user::UserId,
};

/// A simplified transaction view for the monthly history.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedAmount {
    pub amount: Amount,
    pub date: OffsetDateTime,
    pub transaction_type: TransactionType,
}

/// Gets the amount, date and type of `user_id`'s transactions within `date_range`.
///
/// No particular order is guaranteed.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query preparation or execution fails.
pub fn get_amounts_in_range(
    user_id: &UserId,
    date_range: &DateTimeRange,
    connection: &Connection,
) -> Result<Vec<DatedAmount>, Error> {
    connection
        .prepare(
            "SELECT amount, date, type FROM \"transaction\"
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
        )?
        .query_map(
            (
                user_id.as_str(),
                date_range.start().unix_timestamp(),
                date_range.end().unix_timestamp(),
            ),
            |row| {
                Ok(DatedAmount {
                    amount: row.get(0)?,
                    date: map_timestamp(row, 1)?,
                    transaction_type: row.get(2)?,
                })
            },
        )?
        .collect::<Result<Vec<DatedAmount>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
