//! Buyers and suppliers.
//!
//! Parties are visible to every role. Edits and deletes are owner-scoped for
//! non-admins, and a party referenced by transactions cannot be deleted.

mod error;
mod service;
mod types;
mod validation;

pub use error::PartyError;
pub use service::{PartyRepository, PartyService};
pub use types::{CreatePartyInput, Party, PartyFilter, PartyItem, PartyType, UpdatePartyInput};
pub use validation::{validate_items, validate_name};
