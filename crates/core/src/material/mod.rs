//! Inventory materials.
//!
//! Quantities change through [`MaterialService::update`] (manual correction) or as a
//! side effect of ledger transactions, always through [`apply_stock_delta`].

mod error;
mod service;
mod stock;
mod types;

pub use error::MaterialError;
pub use service::{MaterialRepository, MaterialService};
pub use stock::apply_stock_delta;
pub use types::{
    CreateMaterialInput, Material, MaterialCategory, MaterialFilter, MaterialUnit,
    UpdateMaterialInput,
};
