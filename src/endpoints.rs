//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The liveness probe.
pub const HEALTH: &str = "/api/health";
/// The route for listing the global category catalog.
pub const CATEGORIES: &str = "/api/categories";
/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the income and expense summary of a single month.
pub const TRANSACTION_SUMMARY: &str = "/api/transactions/summary";
/// The route for monthly income and expense totals over several months.
pub const TRANSACTION_HISTORY: &str = "/api/transactions/historical";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is the first substring that starts with '{' and ends with '}',
/// e.g. '{transaction_id}' in '/api/transactions/{transaction_id}'.
///
/// If no parameter is found in `endpoint_path`, the original path is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
