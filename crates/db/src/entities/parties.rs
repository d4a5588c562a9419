//! `SeaORM` Entity for parties table.

use chrono::Utc;
use fenceledger_core::RepositoryError;
use fenceledger_core::party::{Party, PartyItem};
use fenceledger_shared::types::{PartyId, UserId};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub party_type: String,
    pub contact: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
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

impl TryFrom<Model> for Party {
    type Error = RepositoryError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let items: Vec<PartyItem> = serde_json::from_value(model.items)
            .map_err(|e| RepositoryError::Corrupt(format!("party {} items: {e}", model.id)))?;

        Ok(Self {
            id: PartyId::from_uuid(model.id),
            name: model.name,
            party_type: model.party_type.parse()?,
            contact: model.contact,
            items,
            owner_id: UserId::from_uuid(model.owner_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

impl TryFrom<&Party> for ActiveModel {
    type Error = RepositoryError;

    fn try_from(party: &Party) -> Result<Self, Self::Error> {
        let items = serde_json::to_value(&party.items)
            .map_err(|e| RepositoryError::Corrupt(format!("party {} items: {e}", party.id)))?;

        Ok(Self {
            id: Set(party.id.into_inner()),
            name: Set(party.name.clone()),
            party_type: Set(party.party_type.as_str().to_string()),
            contact: Set(party.contact.clone()),
            items: Set(items),
            owner_id: Set(party.owner_id.into_inner()),
            created_at: Set(party.created_at.into()),
            updated_at: Set(party.updated_at.into()),
        })
    }
}
