//! Translation of sqlx errors into the domain error taxonomy.

use gacha_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error onto [`CoreError`].
///
/// - Unique violations become `Conflict`, with a readable message for the
///   constraints players can hit.
/// - Pool exhaustion and connection failures become `Transient`.
/// - Everything else is `Internal`.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            let message = match db_err.constraint() {
                Some("uq_players_username") => {
                    "There already exists a user with that username".to_string()
                }
                Some("uq_players_email") => {
                    "There already exists a user with that email".to_string()
                }
                Some("uq_character_index_name") => {
                    "A character with that name is already in the index".to_string()
                }
                Some(constraint) => {
                    format!("Duplicate value violates unique constraint: {constraint}")
                }
                None => "Duplicate value".to_string(),
            };
            CoreError::Conflict(message)
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "Database unavailable");
            CoreError::Transient(err.to_string())
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            CoreError::Internal(err.to_string())
        }
    }
}

/// True for a foreign-key violation, used where a missing parent row means
/// `NotFound` rather than a server error.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    )
}
