//! Report service implementation.

use super::error::ReportError;
use super::types::{ReportSummary, summarize};
use crate::auth::Principal;
use crate::ledger::{TransactionFilter, TransactionRepository};
use crate::material::{MaterialFilter, MaterialRepository};

/// Builds reports over the caller's scope.
pub struct ReportService<'a, R: MaterialRepository + TransactionRepository> {
    repo: &'a R,
}

impl<'a, R: MaterialRepository + TransactionRepository> ReportService<'a, R> {
    /// Create a new report service.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Summary of every material and transaction visible to the caller.
    pub async fn summary(&self, principal: &Principal) -> Result<ReportSummary, ReportError> {
        let owner = principal.owner_scope();
        let materials = self
            .repo
            .list_materials(&MaterialFilter::default(), owner)
            .await?;
        let transactions = self
            .repo
            .list_transactions(&TransactionFilter::default(), owner)
            .await?;

        Ok(summarize(&materials, &transactions))
    }
}
