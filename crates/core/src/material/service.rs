//! Material service implementation.

use std::future::Future;

use chrono::Utc;
use fenceledger_shared::types::{MaterialId, UserId};
use rust_decimal::Decimal;

use super::error::MaterialError;
use super::types::{
    CreateMaterialInput, Material, MaterialCategory, MaterialFilter, UpdateMaterialInput,
};
use crate::amount::fits_storage;
use crate::auth::Principal;
use crate::repository::RepositoryError;

/// Repository trait for material persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// `owner` is the ownership filter; `None` matches every owner.
pub trait MaterialRepository: Send + Sync {
    /// Find a material by ID within an ownership scope.
    fn find_material(
        &self,
        id: MaterialId,
        owner: Option<UserId>,
    ) -> impl Future<Output = Result<Option<Material>, RepositoryError>> + Send;

    /// Find a material by ID and lock it for a stock change.
    fn find_material_for_update(
        &self,
        id: MaterialId,
    ) -> impl Future<Output = Result<Option<Material>, RepositoryError>> + Send;

    /// List materials, newest first.
    fn list_materials(
        &self,
        filter: &MaterialFilter,
        owner: Option<UserId>,
    ) -> impl Future<Output = Result<Vec<Material>, RepositoryError>> + Send;

    /// Insert a new material.
    fn insert_material(
        &self,
        material: &Material,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Overwrite every mutable field of a material.
    fn update_material(
        &self,
        material: &Material,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Set stock on hand.
    fn set_material_quantity(
        &self,
        id: MaterialId,
        quantity: Decimal,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a material.
    fn delete_material(
        &self,
        id: MaterialId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Material CRUD with role and ownership rules applied.
pub struct MaterialService<'a, R: MaterialRepository> {
    repo: &'a R,
}

impl<'a, R: MaterialRepository> MaterialService<'a, R> {
    /// Create a new material service.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Lists materials visible to the caller.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &MaterialFilter,
    ) -> Result<Vec<Material>, MaterialError> {
        Ok(self
            .repo
            .list_materials(filter, principal.owner_scope())
            .await?)
    }

    /// Gets one material visible to the caller.
    pub async fn get(
        &self,
        principal: &Principal,
        id: MaterialId,
    ) -> Result<Material, MaterialError> {
        self.repo
            .find_material(id, principal.owner_scope())
            .await?
            .ok_or(MaterialError::NotFound(id))
    }

    /// Creates a material owned by the caller.
    ///
    /// # Errors
    ///
    /// - `FinalCategoryRestricted` if a StoreBoy creates a Final material
    /// - `Validation` on a blank name or a negative amount
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateMaterialInput,
    ) -> Result<Material, MaterialError> {
        ensure_category_allowed(principal, input.category, "create")?;

        let name = required_name(&input.name)?;
        let quantity = non_negative("quantity", input.quantity.unwrap_or(Decimal::ZERO))?;
        let unit_price = input
            .unit_price
            .map(|price| non_negative("unitPrice", price))
            .transpose()?;
        let low_stock_threshold = non_negative(
            "lowStockThreshold",
            input.low_stock_threshold.unwrap_or(Decimal::ZERO),
        )?;

        let now = Utc::now();
        let material = Material {
            id: MaterialId::new(),
            name,
            category: input.category,
            unit: input.unit,
            quantity,
            unit_price,
            description: input.description,
            low_stock_threshold,
            owner_id: principal.user_id,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert_material(&material).await?;
        Ok(material)
    }

    /// Applies a partial update.
    ///
    /// A StoreBoy may neither edit a Final material nor move a material into Final.
    pub async fn update(
        &self,
        principal: &Principal,
        id: MaterialId,
        input: UpdateMaterialInput,
    ) -> Result<Material, MaterialError> {
        let mut material = self.get(principal, id).await?;

        ensure_category_allowed(principal, material.category, "modify")?;
        if let Some(category) = input.category {
            ensure_category_allowed(principal, category, "modify")?;
            material.category = category;
        }

        if let Some(name) = input.name {
            material.name = required_name(&name)?;
        }
        if let Some(unit) = input.unit {
            material.unit = unit;
        }
        if let Some(quantity) = input.quantity {
            material.quantity = non_negative("quantity", quantity)?;
        }
        if let Some(price) = input.unit_price {
            material.unit_price = Some(non_negative("unitPrice", price)?);
        }
        if let Some(description) = input.description {
            material.description = Some(description);
        }
        if let Some(threshold) = input.low_stock_threshold {
            material.low_stock_threshold = non_negative("lowStockThreshold", threshold)?;
        }
        material.updated_at = Utc::now();

        self.repo.update_material(&material).await?;
        Ok(material)
    }

    /// Deletes a material. Transactions that referenced it keep their snapshots.
    pub async fn delete(&self, principal: &Principal, id: MaterialId) -> Result<(), MaterialError> {
        let material = self.get(principal, id).await?;
        ensure_category_allowed(principal, material.category, "delete")?;

        self.repo.delete_material(id).await?;
        Ok(())
    }
}

fn ensure_category_allowed(
    principal: &Principal,
    category: MaterialCategory,
    action: &'static str,
) -> Result<(), MaterialError> {
    if category == MaterialCategory::Final && !principal.role.can_handle_final_goods() {
        return Err(MaterialError::FinalCategoryRestricted { action });
    }
    Ok(())
}

fn required_name(name: &str) -> Result<String, MaterialError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MaterialError::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &str, value: Decimal) -> Result<Decimal, MaterialError> {
    if value < Decimal::ZERO {
        return Err(MaterialError::validation(format!("{field} cannot be negative")));
    }
    if !fits_storage(value) {
        return Err(MaterialError::validation(format!(
            "{field} is out of range: at most 15 integer digits and 4 decimal places"
        )));
    }
    Ok(value)
}
