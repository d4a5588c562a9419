//! Parsing failures for the closed string enums used on the wire and in storage.

use fenceledger_shared::AppError;
use thiserror::Error;

/// A string did not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// What was being parsed, e.g. `role`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    /// Creates a new parse failure.
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl From<UnknownVariant> for AppError {
    fn from(err: UnknownVariant) -> Self {
        Self::Validation(err.to_string())
    }
}
