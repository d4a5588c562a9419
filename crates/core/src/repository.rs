//! Errors shared by every repository trait.

use fenceledger_shared::AppError;
use thiserror::Error;

use crate::variant::UnknownVariant;

/// Failure reported by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying store rejected or failed the operation.
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

impl From<UnknownVariant> for RepositoryError {
    fn from(err: UnknownVariant) -> Self {
        Self::Corrupt(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(msg) => Self::Database(msg),
            RepositoryError::Corrupt(msg) => Self::Internal(msg),
        }
    }
}
