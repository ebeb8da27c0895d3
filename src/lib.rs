//! A personal-finance tracker.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions against a catalog of categories, and for summarising them by
//! month.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod auth;
mod calendar;
mod category;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod money;
mod routing;
mod summary;
#[cfg(test)]
mod test_utils;
mod transaction;
mod transaction_type;
mod user;

pub use app_state::AppState;
pub use auth::register_api_token;
pub use category::seed_global_categories;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry an `Authorization` header.
    #[error("authorization token not provided")]
    MissingToken,

    /// The bearer token does not belong to any known user.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The query string could not be parsed or is missing required fields.
    #[error("{0}")]
    InvalidQuery(String),

    /// The request body could not be parsed as the expected JSON object.
    #[error("{0}")]
    InvalidJson(String),

    /// A month outside of 1-12 was given.
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(i64),

    /// A year outside of the supported range was given.
    #[error("year {0} is outside of the supported range")]
    InvalidYear(i64),

    /// The number of months for the transaction history is outside of 1-12.
    #[error("the number of months must be between 1 and 12, got {0}")]
    InvalidHistoryWindow(i64),

    /// An empty string was used for a transaction description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A transaction amount was not positive or was too large to accept.
    #[error("amount must be a positive number")]
    NonPositiveAmount,

    /// A transaction date could not be parsed.
    ///
    /// Holds the string that failed to parse.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// The category does not exist or its type does not match the transaction type.
    #[error("invalid category")]
    InvalidCategory,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist or belongs to another user.
    #[error("transaction not found")]
    DeleteMissingTransaction,

    /// The transactions for a summary or listing could not be queried.
    #[error("failed to retrieve transactions")]
    RetrieveTransactions,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingToken | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::InvalidQuery(_)
            | Error::InvalidJson(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::InvalidHistoryWindow(_)
            | Error::EmptyDescription
            | Error::NonPositiveAmount
            | Error::InvalidDate(_)
            | Error::InvalidCategory => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::DeleteMissingTransaction => StatusCode::NOT_FOUND,
            Error::RetrieveTransactions | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Error::SqlError(_) | Error::DatabaseLockError => {
                // These are not intended to be shown to the client.
                tracing::error!("An unexpected error occurred: {}", self);
                "an unexpected error occurred, check the server logs for more details".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
