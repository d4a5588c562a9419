//! `SeaORM` Entity for materials table.

use chrono::Utc;
use fenceledger_core::UnknownVariant;
use fenceledger_core::material::Material;
use fenceledger_shared::types::{MaterialId, UserId};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub unit_price: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub low_stock_threshold: Decimal,
    pub owner_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Material {
    type Error = UnknownVariant;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MaterialId::from_uuid(model.id),
            name: model.name,
            category: model.category.parse()?,
            unit: model.unit.parse()?,
            quantity: model.quantity,
            unit_price: model.unit_price,
            description: model.description,
            low_stock_threshold: model.low_stock_threshold,
            owner_id: UserId::from_uuid(model.owner_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

impl From<&Material> for ActiveModel {
    fn from(material: &Material) -> Self {
        Self {
            id: Set(material.id.into_inner()),
            name: Set(material.name.clone()),
            category: Set(material.category.as_str().to_string()),
            unit: Set(material.unit.as_str().to_string()),
            quantity: Set(material.quantity),
            unit_price: Set(material.unit_price),
            description: Set(material.description.clone()),
            low_stock_threshold: Set(material.low_stock_threshold),
            owner_id: Set(material.owner_id.into_inner()),
            created_at: Set(material.created_at.into()),
            updated_at: Set(material.updated_at.into()),
        }
    }
}
