//! Party validation rules.

use rust_decimal::Decimal;

use super::error::PartyError;
use super::types::PartyItem;

/// Trims a party name and rejects blank ones.
pub fn validate_name(name: &str) -> Result<String, PartyError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PartyError::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}

/// Validates a full item catalog and returns it with trimmed names.
///
/// The catalog must be non-empty, every name non-blank, every price `>= 0`.
pub fn validate_items(items: Vec<PartyItem>) -> Result<Vec<PartyItem>, PartyError> {
    if items.is_empty() {
        return Err(PartyError::validation(
            "A party must contain at least one item.",
        ));
    }

    items
        .into_iter()
        .map(|item| {
            let item_name = item.item_name.trim().to_string();
            if item_name.is_empty() {
                return Err(PartyError::validation("Each item must have an itemName"));
            }
            if item.item_price < Decimal::ZERO {
                return Err(PartyError::validation(
                    "Each item must have a valid itemPrice (>= 0)",
                ));
            }
            Ok(PartyItem {
                item_name,
                item_price: item.item_price,
            })
        })
        .collect()
}
