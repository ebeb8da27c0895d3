//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router, middleware,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::auth_guard,
    category::get_categories_endpoint,
    endpoints,
    summary::{get_history_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::TRANSACTION_HISTORY, get(get_history_endpoint))
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Liveness probe.
async fn get_health() -> Response {
    Json(json!({ "status": "ok", "message": "finance tracker API is running" })).into_response()
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
