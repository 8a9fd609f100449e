//! Domain errors raised by validation and lookups.
//!
//! The API layer maps each variant onto an HTTP status and a stable `code`
//! string; the `Display` text is for logs.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row the caller asked for by id does not exist (or is not theirs).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad input: missing fields, malformed email, out-of-range coordinates,
    /// unknown columns or query options.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A unique constraint would be violated.
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Missing or bad credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but touching another user's rows.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
