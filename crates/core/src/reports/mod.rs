//! Summary reporting over materials and transactions.

mod error;
mod service;
mod types;

pub use error::ReportError;
pub use service::ReportService;
pub use types::{CategoryStockValue, ReportSummary, TransactionTotals, summarize};
