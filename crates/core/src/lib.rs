//! Core business logic for fenceledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the repository traits declared next to
//! each service; the db crate implements them.
//!
//! # Modules
//!
//! - `amount` - Storage bounds for quantities and money
//! - `auth` - Roles, principals, and password hashing
//! - `material` - Inventory records and stock arithmetic
//! - `party` - Buyers, suppliers, and their item catalogs
//! - `ledger` - Transactions and per-party running balances
//! - `reports` - Summary figures over materials and transactions

pub mod amount;
pub mod auth;
pub mod ledger;
pub mod material;
pub mod party;
pub mod reports;
pub mod repository;
pub mod variant;

#[cfg(test)]
mod test_support;

pub use repository::RepositoryError;
pub use variant::UnknownVariant;
