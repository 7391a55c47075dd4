//! Domain error taxonomy shared across crates.

use crate::types::DbId;

/// Domain-level errors surfaced by core logic and repositories.
///
/// The API layer maps these onto HTTP status codes: `NotFound` -> 404,
/// `Validation` -> 400, `Conflict` -> 409, `Internal` -> 500.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity does not exist (or is not in the expected state).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or inconsistent input, e.g. an unpublish time before the
    /// publish time. Always recoverable by the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with the entity's current state, e.g. purging
    /// a record that is not in the trash.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An unexpected internal failure. Indicates a bug or infrastructure
    /// fault, not a caller error.
    #[error("Internal error: {0}")]
    Internal(String),
}
