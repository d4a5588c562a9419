//! Party types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use fenceledger_shared::types::{PartyId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::variant::UnknownVariant;

/// Which side of a trade the party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyType {
    /// Buys finished fencing.
    Buyer,
    /// Supplies raw material.
    Supplier,
}

impl PartyType {
    /// Wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Supplier => "Supplier",
        }
    }
}

impl std::fmt::Display for PartyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Buyer" => Ok(Self::Buyer),
            "Supplier" => Ok(Self::Supplier),
            other => Err(UnknownVariant::new("party type", other)),
        }
    }
}

/// A catalog entry a party trades in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyItem {
    /// Item name, never blank once validated.
    #[serde(default)]
    pub item_name: String,
    /// Agreed price, never negative.
    pub item_price: Decimal,
}

/// A buyer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    /// Party ID.
    pub id: PartyId,
    /// Display name, snapshotted onto transactions.
    pub name: String,
    /// Buyer or supplier.
    #[serde(rename = "type")]
    pub party_type: PartyType,
    /// Phone or address.
    pub contact: Option<String>,
    /// At least one item.
    pub items: Vec<PartyItem>,
    /// User who created the party.
    pub owner_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a party.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyInput {
    /// Display name.
    pub name: String,
    /// Buyer or supplier.
    #[serde(rename = "type")]
    pub party_type: PartyType,
    /// Phone or address.
    #[serde(default)]
    pub contact: Option<String>,
    /// Item catalog; an absent list fails validation like an empty one.
    #[serde(default)]
    pub items: Vec<PartyItem>,
}

/// Partial update of a party. `items`, when present, replaces the whole catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartyInput {
    /// New name; propagated to the caller's transactions.
    pub name: Option<String>,
    /// New type.
    #[serde(rename = "type")]
    pub party_type: Option<PartyType>,
    /// New contact.
    pub contact: Option<String>,
    /// Replacement catalog.
    pub items: Option<Vec<PartyItem>>,
}

/// List filter for parties.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyFilter {
    /// Only this type.
    #[serde(rename = "type")]
    pub party_type: Option<PartyType>,
}
