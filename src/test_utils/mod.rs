#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, build_router,
    category::{Category, find_category, seed_global_categories},
    money::Amount,
    register_api_token,
    transaction::{Transaction, create_transaction},
    transaction_type::TransactionType,
    user::UserId,
};

/// The full application backed by an in-memory database with the category
/// catalog seeded and one registered user.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub const USER_ID: &'static str = "test-user";
    pub const TOKEN: &'static str = "test-token";

    pub fn new() -> Self {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection).expect("Could not create app state.");
        {
            let connection = state.db_connection.lock().unwrap();
            seed_global_categories(&connection).unwrap();
            register_api_token(&UserId::new(Self::USER_ID), Self::TOKEN, &connection).unwrap();
        }

        let server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

        Self { server, state }
    }

    /// The `Authorization` header value for the test user.
    pub fn authorization() -> String {
        format!("Bearer {}", Self::TOKEN)
    }

    #[track_caller]
    pub fn category(&self, name: &str, transaction_type: TransactionType) -> Category {
        let connection = self.state.db_connection.lock().unwrap();

        find_category(name, transaction_type, &connection)
            .unwrap()
            .unwrap_or_else(|| panic!("no {transaction_type} category named {name}"))
    }

    /// Store a transaction for the test user, filed under the catalog category `category_name`.
    #[track_caller]
    pub fn insert_transaction(
        &self,
        transaction_type: TransactionType,
        category_name: &str,
        cents: i64,
        date: OffsetDateTime,
    ) -> Transaction {
        self.insert_transaction_for(Self::USER_ID, transaction_type, category_name, cents, date)
    }

    #[track_caller]
    pub fn insert_transaction_for(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        category_name: &str,
        cents: i64,
        date: OffsetDateTime,
    ) -> Transaction {
        let category = self.category(category_name, transaction_type);
        let connection = self.state.db_connection.lock().unwrap();

        create_transaction(
            Transaction::build(
                UserId::new(user_id),
                transaction_type,
                category.id,
                Amount::from_cents(cents),
                date,
            )
            .description(category_name),
            &connection,
        )
        .unwrap()
    }

    pub fn count_transactions(&self) -> i64 {
        let connection = self.state.db_connection.lock().unwrap();

        connection
            .query_row("SELECT COUNT(*) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap()
    }
}
