//! Bearer token authentication.
//!
//! Users are identified by an external identity provider. Tokens it issues are
//! registered with [register_api_token] and checked on each request by
//! [auth_guard].

mod middleware;
mod token;

pub use middleware::auth_guard;
pub use token::{create_api_token_table, register_api_token};
