//! Defines the endpoint for listing a user's transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    calendar::YearMonth,
    database_id::CategoryId,
    transaction::{
        Transaction,
        core::{TransactionFilter, get_transactions},
    },
    transaction_type::TransactionType,
    user::UserId,
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The optional query parameters for filtering the transaction listing.
///
/// The month filter only applies when both `month` and `year` are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    month: Option<i64>,
    year: Option<i64>,
    #[serde(rename = "type")]
    transaction_type: Option<TransactionType>,
    category_id: Option<CategoryId>,
}

impl ListTransactionsQuery {
    fn into_filter(self) -> Result<TransactionFilter, Error> {
        let date_range = match (self.month, self.year) {
            (Some(month), Some(year)) => Some(YearMonth::new(year, month)?.range()),
            _ => None,
        };

        Ok(TransactionFilter {
            date_range,
            transaction_type: self.transaction_type,
            category_id: self.category_id,
        })
    }
}

/// A route handler that lists the caller's transactions, most recent first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserId>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Query(query) = query.map_err(|rejection| Error::InvalidQuery(rejection.body_text()))?;
    let filter = query.into_filter()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(&user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("could not list transactions for {user_id}: {error}"))
        .map_err(|_| Error::RetrieveTransactions)
        .map(Json)
}
