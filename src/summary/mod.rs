//! Summary module
//!
//! Derives a month's income and expense summary and the monthly history from
//! a user's transactions. Every view is rebuilt from the database on each
//! request.

mod handlers;
mod history;
mod period;
mod transaction;

pub use handlers::{get_history_endpoint, get_summary_endpoint};
