//! Party error types.

use fenceledger_shared::AppError;
use fenceledger_shared::types::PartyId;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Party operation errors.
#[derive(Debug, Error)]
pub enum PartyError {
    /// Party does not exist, or is outside the caller's scope for a mutation.
    #[error("Party not found")]
    NotFound(PartyId),

    /// A field failed validation.
    #[error("{0}")]
    Validation(String),

    /// Transactions still reference the party.
    #[error(
        "Cannot delete party with existing transactions. Please delete all transactions first."
    )]
    HasTransactions {
        /// Number of referencing transactions in the caller's scope.
        count: u64,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PartyError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<PartyError> for AppError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::NotFound(_) => Self::NotFound(err.to_string()),
            PartyError::Validation(msg) => Self::Validation(msg),
            PartyError::HasTransactions { .. } => Self::Conflict(err.to_string()),
            PartyError::Repository(e) => e.into(),
        }
    }
}
