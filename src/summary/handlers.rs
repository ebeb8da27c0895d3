//! HTTP handlers for the month summary and monthly history endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    calendar::YearMonth,
    summary::{
        history::{HistoryWindow, MonthlyBucket, build_monthly_history, history_range},
        period::{PeriodSummary, build_period_summary},
        transaction::get_amounts_in_range,
    },
    transaction::{TransactionFilter, get_transactions},
    user::UserId,
};

/// The range of years the monthly history can be requested for.
const HISTORY_YEARS: std::ops::RangeInclusive<i64> = 2000..=2100;

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the month summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    month: i64,
    year: i64,
}

/// The query parameters for the monthly history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    month: i64,
    year: i64,
    /// Defaults to [HistoryWindow::DEFAULT] months.
    months: Option<i64>,
}

/// The body of the monthly history response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryResponse {
    /// One bucket per month, oldest first.
    pub history: Vec<MonthlyBucket>,
}

/// A route handler for the caller's income and expense summary of one month.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserId>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<PeriodSummary>, Error> {
    let Query(query) = query.map_err(|rejection| Error::InvalidQuery(rejection.body_text()))?;
    let month = YearMonth::new(query.year, query.month)?;

    let filter = TransactionFilter {
        date_range: Some(month.range()),
        ..Default::default()
    };

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions(&user_id, &filter, &connection)
            .inspect_err(|error| {
                tracing::error!(
                    "could not get transactions for the {} summary of {user_id}: {error}",
                    month.label()
                )
            })
            .map_err(|_| Error::RetrieveTransactions)?
    };

    Ok(Json(build_period_summary(&transactions)))
}

/// A route handler for the caller's income and expenses over the months
/// leading up to and including the requested month.
pub async fn get_history_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserId>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, Error> {
    let Query(query) = query.map_err(|rejection| Error::InvalidQuery(rejection.body_text()))?;

    if !(1..=12).contains(&query.month) {
        return Err(Error::InvalidMonth(query.month));
    }
    if !HISTORY_YEARS.contains(&query.year) {
        return Err(Error::InvalidYear(query.year));
    }

    let window = match query.months {
        Some(months) => HistoryWindow::new(months)?,
        None => HistoryWindow::default(),
    };
    let anchor = YearMonth::new(query.year, query.month)?;
    let date_range = history_range(anchor, window)?;

    let amounts = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_amounts_in_range(&user_id, &date_range, &connection)
            .inspect_err(|error| {
                tracing::error!("could not get transactions for the history of {user_id}: {error}")
            })
            .map_err(|_| Error::RetrieveTransactions)?
    };

    let history = build_monthly_history(anchor, window, &amounts)?;

    Ok(Json(HistoryResponse { history }))
}
