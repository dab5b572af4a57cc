#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing argument. Always the caller's fault; never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient {resource}: {required} required, {available} available")]
    InsufficientResource {
        resource: String,
        required: i64,
        available: i64,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Store unavailable or timed out. Safe to retry the whole operation.
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for an [`CoreError::InvalidInput`] naming the offending field.
    pub fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        CoreError::InvalidInput(format!("{field} {reason}"))
    }
}
