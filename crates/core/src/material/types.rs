//! Material types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use fenceledger_shared::types::{MaterialId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::variant::UnknownVariant;

/// Production stage of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialCategory {
    /// Bought-in raw stock (wire, posts).
    Raw,
    /// Partly processed stock.
    #[serde(rename = "Semi-Finished")]
    SemiFinished,
    /// Finished goods ready for sale.
    Final,
}

impl MaterialCategory {
    /// All categories in production order.
    pub const ALL: [Self; 3] = [Self::Raw, Self::SemiFinished, Self::Final];

    /// Wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::SemiFinished => "Semi-Finished",
            Self::Final => "Final",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Raw" => Ok(Self::Raw),
            "Semi-Finished" => Ok(Self::SemiFinished),
            "Final" => Ok(Self::Final),
            other => Err(UnknownVariant::new("category", other)),
        }
    }
}

/// Unit a material is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialUnit {
    /// Kilograms.
    Kg,
    /// Pieces.
    Pcs,
}

impl MaterialUnit {
    /// Wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Pcs => "pcs",
        }
    }
}

impl std::fmt::Display for MaterialUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialUnit {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Self::Kg),
            "pcs" => Ok(Self::Pcs),
            other => Err(UnknownVariant::new("unit", other)),
        }
    }
}

/// An inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Material ID.
    pub id: MaterialId,
    /// Display name.
    pub name: String,
    /// Production stage.
    pub category: MaterialCategory,
    /// Counting unit.
    pub unit: MaterialUnit,
    /// Stock on hand, never negative.
    pub quantity: Decimal,
    /// Reference price per unit.
    pub unit_price: Option<Decimal>,
    /// Free-form description.
    pub description: Option<String>,
    /// Stock level at or below which the material is reported as low. Zero disables.
    pub low_stock_threshold: Decimal,
    /// User who created the record.
    pub owner_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Returns true if a threshold is set and stock has fallen to it.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.low_stock_threshold > Decimal::ZERO && self.quantity <= self.low_stock_threshold
    }

    /// Quantity valued at the reference price; no price counts as zero.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_price.unwrap_or(Decimal::ZERO))
    }
}

/// Input for creating a material.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialInput {
    /// Display name.
    pub name: String,
    /// Production stage.
    pub category: MaterialCategory,
    /// Counting unit.
    pub unit: MaterialUnit,
    /// Opening stock, zero when absent.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Reference price per unit.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Low-stock threshold, zero when absent.
    #[serde(default)]
    pub low_stock_threshold: Option<Decimal>,
}

/// Partial update of a material. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialInput {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<MaterialCategory>,
    /// New unit.
    pub unit: Option<MaterialUnit>,
    /// Stock correction.
    pub quantity: Option<Decimal>,
    /// New reference price.
    pub unit_price: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New low-stock threshold.
    pub low_stock_threshold: Option<Decimal>,
}

/// List filter for materials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialFilter {
    /// Only this category.
    pub category: Option<MaterialCategory>,
}
