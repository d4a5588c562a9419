//! `SeaORM` Entity for transactions table.

use chrono::Utc;
use fenceledger_core::UnknownVariant;
use fenceledger_core::ledger::LedgerTransaction;
use fenceledger_core::material::MaterialCategory;
use fenceledger_shared::types::{MaterialId, PartyId, TransactionId, UserId};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(unique)]
    pub bill_no: String,
    pub material_id: Option<Uuid>,
    pub material_name: Option<String>,
    pub category: Option<String>,
    #[sea_orm(column_name = "type")]
    pub transaction_type: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub credit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total: Decimal,
    pub party_id: Option<Uuid>,
    pub party_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::materials::Entity",
        from = "Column::MaterialId",
        to = "super::materials::Column::Id",
        on_delete = "SetNull"
    )]
    Materials,
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::PartyId",
        to = "super::parties::Column::Id",
        on_delete = "SetNull"
    )]
    Parties,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Materials.def()
    }
}

impl Related<super::parties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parties.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LedgerTransaction {
    type Error = UnknownVariant;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TransactionId::from_uuid(model.id),
            date: model.date.with_timezone(&Utc),
            bill_no: model.bill_no,
            material_id: model.material_id.map(MaterialId::from_uuid),
            material_name: model.material_name,
            category: model.category.as_deref().map(str::parse::<MaterialCategory>).transpose()?,
            transaction_type: model.transaction_type.parse()?,
            quantity: model.quantity,
            unit_price: model.unit_price,
            debit: model.debit,
            credit: model.credit,
            total: model.total,
            party_id: model.party_id.map(PartyId::from_uuid),
            party_name: model.party_name,
            notes: model.notes,
            owner_id: UserId::from_uuid(model.owner_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

impl From<&LedgerTransaction> for ActiveModel {
    fn from(tx: &LedgerTransaction) -> Self {
        Self {
            id: Set(tx.id.into_inner()),
            date: Set(tx.date.into()),
            bill_no: Set(tx.bill_no.clone()),
            material_id: Set(tx.material_id.map(MaterialId::into_inner)),
            material_name: Set(tx.material_name.clone()),
            category: Set(tx.category.map(|c| c.as_str().to_string())),
            transaction_type: Set(tx.transaction_type.as_str().to_string()),
            quantity: Set(tx.quantity),
            unit_price: Set(tx.unit_price),
            debit: Set(tx.debit),
            credit: Set(tx.credit),
            total: Set(tx.total),
            party_id: Set(tx.party_id.map(PartyId::into_inner)),
            party_name: Set(tx.party_name.clone()),
            notes: Set(tx.notes.clone()),
            owner_id: Set(tx.owner_id.into_inner()),
            created_at: Set(tx.created_at.into()),
            updated_at: Set(tx.updated_at.into()),
        }
    }
}
