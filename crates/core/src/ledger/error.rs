//! Ledger error types.

use fenceledger_shared::AppError;
use fenceledger_shared::types::{MaterialId, PartyId, TransactionId};
use thiserror::Error;

use super::types::TransactionType;
use crate::repository::RepositoryError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction does not exist in the caller's scope.
    #[error("Transaction not found")]
    TransactionNotFound(TransactionId),

    /// Referenced material does not exist in the caller's scope.
    #[error("Material not found")]
    MaterialNotFound(MaterialId),

    /// Referenced party does not exist.
    #[error("Party not found")]
    PartyNotFound(PartyId),

    /// Purchase and Sale must name the material they move.
    #[error("materialId is required for {0} transactions")]
    MaterialRequired(TransactionType),

    /// Quantity must be strictly positive.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Unit price must not be negative.
    #[error("Unit price cannot be negative")]
    NegativeUnitPrice,

    /// A value or a derived amount falls outside the stored range.
    #[error("{0} is out of range: at most 15 integer digits and 4 decimal places")]
    OutOfRange(&'static str),

    /// Filter range is inverted.
    #[error("startDate must not be after endDate")]
    InvalidDateRange,

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::TransactionNotFound(_)
            | LedgerError::MaterialNotFound(_)
            | LedgerError::PartyNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::MaterialRequired(_)
            | LedgerError::NonPositiveQuantity
            | LedgerError::NegativeUnitPrice
            | LedgerError::OutOfRange(_)
            | LedgerError::InvalidDateRange => Self::Validation(err.to_string()),
            LedgerError::Repository(e) => e.into(),
        }
    }
}
