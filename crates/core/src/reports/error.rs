//! Report error types.

use fenceledger_shared::AppError;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Report generation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Repository(e) => e.into(),
        }
    }
}
