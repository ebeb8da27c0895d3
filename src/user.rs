//! The identity of the user making a request.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A newtype wrapper for the opaque user IDs issued by the identity provider.
///
/// This helps disambiguate user IDs from other strings, leading to better compile time
/// errors. The application never interprets the contents of the ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
