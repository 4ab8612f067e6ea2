//! Error types for desk operations.

use database::DatabaseError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during desk operations.
///
/// The three categories surface differently: validation failures are
/// reported before any query runs, missing complaints are distinguishable
/// from other failures, and everything else is a backend error whose
/// details belong in logs rather than user-facing responses.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Input rejected before reaching the store.
    #[error("{0}")]
    Validation(String),

    /// The referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Underlying store failure.
    #[error("backend error: {0}")]
    Backend(DatabaseError),
}

impl From<DatabaseError> for DeskError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => DeskError::NotFound { entity, id },
            other => DeskError::Backend(other),
        }
    }
}

impl From<ValidationError> for DeskError {
    fn from(err: ValidationError) -> Self {
        DeskError::Validation(err.to_string())
    }
}

/// Result type for desk operations.
pub type Result<T> = std::result::Result<T, DeskError>;
