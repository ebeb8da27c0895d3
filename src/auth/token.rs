//! API tokens issued by the identity provider and the users they belong to.
//!
//! Only the SHA-512 hash of a token is stored, so a leaked database does not
//! leak usable tokens.

use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha512};
use time::OffsetDateTime;

use crate::{Error, user::UserId};

fn hash_token(token: &str) -> Vec<u8> {
    Sha512::digest(token.as_bytes()).to_vec()
}

/// Accept `token` as proof of identity for `user_id`.
///
/// Registering a token that is already known moves it to `user_id`.
///
/// # Errors
/// Returns an [Error::InvalidToken] if `token` is empty or only whitespace, or
/// an [Error::SqlError] if there is an SQL error.
pub fn register_api_token(
    user_id: &UserId,
    token: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::InvalidToken);
    }

    connection.execute(
        "INSERT INTO api_token (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(token_hash) DO UPDATE SET user_id = excluded.user_id",
        (
            hash_token(token),
            user_id.as_str(),
            OffsetDateTime::now_utc().unix_timestamp(),
        ),
    )?;

    Ok(())
}

/// Look up the user a token was registered for.
pub fn find_user_by_token(token: &str, connection: &Connection) -> Result<Option<UserId>, Error> {
    connection
        .prepare("SELECT user_id FROM api_token WHERE token_hash = ?1")?
        .query_row([hash_token(token)], |row| row.get::<_, String>(0))
        .optional()
        .map(|user_id| user_id.map(UserId::new))
        .map_err(|error| error.into())
}

/// Create the API token table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_api_token_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS api_token (
            token_hash BLOB PRIMARY KEY,
            user_id TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}
