//! Transaction ledger with per-party running balances.
//!
//! A party ledger is keyed by the transaction owner and the party. Every
//! mutation that touches a ledger replays it in `(date, id)` order and rewrites
//! the stored `total` of each entry that changed, so stored totals always equal
//! the chronological prefix sums of `debit - credit`.

mod balance;
mod bill_no;
mod date;
mod error;
mod service;
mod types;

#[cfg(test)]
mod service_props;

pub use balance::{RunningBalance, replay, sort_chronologically};
pub use bill_no::{BillNumberGenerator, next_bill_no};
pub use date::{deserialize_optional_datetime, parse_flexible_datetime};
pub use error::LedgerError;
pub use service::{LedgerService, TransactionRepository};
pub use types::{
    CreateTransactionInput, LedgerKey, LedgerTransaction, PartyStatement, TransactionFilter,
    TransactionType, UpdateTransactionInput,
};
