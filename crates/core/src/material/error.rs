//! Material error types.

use fenceledger_shared::AppError;
use fenceledger_shared::types::MaterialId;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Material operation errors.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// Material does not exist in the caller's scope.
    #[error("Material not found")]
    NotFound(MaterialId),

    /// A field failed validation.
    #[error("{0}")]
    Validation(String),

    /// The caller's role may not handle Final category materials.
    #[error("StoreBoy cannot {action} Final category materials")]
    FinalCategoryRestricted {
        /// The attempted action, e.g. `create`.
        action: &'static str,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl MaterialError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<MaterialError> for AppError {
    fn from(err: MaterialError) -> Self {
        match err {
            MaterialError::NotFound(_) => Self::NotFound(err.to_string()),
            MaterialError::Validation(msg) => Self::Validation(msg),
            MaterialError::FinalCategoryRestricted { .. } => Self::Forbidden(err.to_string()),
            MaterialError::Repository(e) => e.into(),
        }
    }
}
