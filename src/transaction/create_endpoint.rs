//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    AppState, Error,
    category::get_category_of_type,
    database_id::CategoryId,
    endpoints::{self, format_endpoint},
    money::Amount,
    transaction::{Transaction, core::create_transaction},
    transaction_type::TransactionType,
    user::UserId,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction in dollars, must be positive.
    pub amount: f64,
    /// When the transaction happened, as RFC 3339 or a plain `YYYY-MM-DD` date.
    pub date: String,
    /// Whether money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored transaction, including its category. The
/// `Location` header points at the new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserId>,
    body: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return Error::InvalidJson(rejection.body_text()).into_response(),
    };

    match create(request, user_id, &state) {
        Ok(transaction) => {
            let location = format_endpoint(endpoints::TRANSACTION, transaction.id);
            (StatusCode::CREATED, [(LOCATION, location)], Json(transaction)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn create(
    request: CreateTransactionRequest,
    user_id: UserId,
    state: &CreateTransactionState,
) -> Result<Transaction, Error> {
    let description = request.description.trim();
    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }

    let amount = Amount::from_decimal(request.amount)
        .filter(|amount| amount.is_positive())
        .ok_or(Error::NonPositiveAmount)?;

    let date = parse_transaction_date(&request.date)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category_of_type(request.category_id, request.transaction_type, &connection)?;

    let builder = Transaction::build(
        user_id,
        request.transaction_type,
        category.id,
        amount,
        date,
    )
    .description(description);

    create_transaction(builder, &connection)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))
}

/// Parse a transaction date given as RFC 3339 or as `YYYY-MM-DD`.
///
/// Plain dates are taken as midnight UTC. The result is always in UTC.
pub fn parse_transaction_date(text: &str) -> Result<OffsetDateTime, Error> {
    if let Ok(datetime) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(datetime.to_offset(UtcOffset::UTC));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}
