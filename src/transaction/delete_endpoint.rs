use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, transaction::core::delete_transaction,
    user::UserId,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's transactions.
///
/// Responds with 204 on success and 404 if the transaction does not exist or
/// belongs to someone else.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &user_id, &connection)
        .inspect_err(|error| {
            if *error != Error::DeleteMissingTransaction {
                tracing::error!("Could not delete transaction {transaction_id}: {error}");
            }
        })
        .map(|_| StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::TestApp,
        transaction_type::TransactionType,
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let app = TestApp::new();
        let transaction = app.insert_transaction(
            TransactionType::Expense,
            "Food",
            1000,
            datetime!(2025-10-26 12:00 UTC),
        );

        let response = app
            .server
            .delete(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .add_header("authorization", TestApp::authorization())
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(app.count_transactions(), 0);
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let app = TestApp::new();
        let transaction = app.insert_transaction_for(
            "someone-else",
            TransactionType::Expense,
            "Food",
            1000,
            datetime!(2025-10-26 12:00 UTC),
        );

        let response = app
            .server
            .delete(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .add_header("authorization", TestApp::authorization())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "transaction not found" }));
        assert_eq!(app.count_transactions(), 1);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let app = TestApp::new();

        let response = app
            .server
            .delete(&format_endpoint(endpoints::TRANSACTION, 1337))
            .add_header("authorization", TestApp::authorization())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
