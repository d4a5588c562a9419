//! `SeaStore`: the core repository traits over a connection or an open transaction.
//!
//! Composite ledger operations build a store over a `DatabaseTransaction` so
//! the row locks taken by `lock_party` and `find_material_for_update` hold
//! until commit:
//!
//! ```ignore
//! let txn = db.begin().await?;
//! let store = SeaStore::new(&txn);
//! LedgerService::new(&store).create(&principal, input).await?;
//! txn.commit().await?;
//! ```

use fenceledger_core::RepositoryError;
use fenceledger_core::ledger::{
    LedgerKey, LedgerTransaction, TransactionFilter, TransactionRepository,
};
use fenceledger_core::material::{Material, MaterialFilter, MaterialRepository};
use fenceledger_core::party::{Party, PartyFilter, PartyRepository};
use fenceledger_shared::types::{MaterialId, PartyId, TransactionId, UserId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{materials, parties, transactions};

/// Repository over any `SeaORM` connection.
#[derive(Debug)]
pub struct SeaStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SeaStore<'a, C> {
    /// Creates a store borrowing a connection or transaction.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

fn db_err(err: DbErr) -> RepositoryError {
    RepositoryError::database(err.to_string())
}

impl<C: ConnectionTrait + Send + Sync> MaterialRepository for SeaStore<'_, C> {
    async fn find_material(
        &self,
        id: MaterialId,
        owner: Option<UserId>,
    ) -> Result<Option<Material>, RepositoryError> {
        let mut query = materials::Entity::find_by_id(id.into_inner());
        if let Some(owner) = owner {
            query = query.filter(materials::Column::OwnerId.eq(owner.into_inner()));
        }

        let model = query.one(self.conn).await.map_err(db_err)?;
        Ok(model.map(Material::try_from).transpose()?)
    }

    async fn find_material_for_update(
        &self,
        id: MaterialId,
    ) -> Result<Option<Material>, RepositoryError> {
        let model = materials::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(Material::try_from).transpose()?)
    }

    async fn list_materials(
        &self,
        filter: &MaterialFilter,
        owner: Option<UserId>,
    ) -> Result<Vec<Material>, RepositoryError> {
        let mut query = materials::Entity::find();
        if let Some(owner) = owner {
            query = query.filter(materials::Column::OwnerId.eq(owner.into_inner()));
        }
        if let Some(category) = filter.category {
            query = query.filter(materials::Column::Category.eq(category.as_str()));
        }

        let models = query
            .order_by_desc(materials::Column::CreatedAt)
            .order_by_desc(materials::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_err)?;

        Ok(models
            .into_iter()
            .map(Material::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn insert_material(&self, material: &Material) -> Result<(), RepositoryError> {
        materials::Entity::insert(materials::ActiveModel::from(material))
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update_material(&self, material: &Material) -> Result<(), RepositoryError> {
        materials::ActiveModel::from(material)
            .update(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn set_material_quantity(
        &self,
        id: MaterialId,
        quantity: Decimal,
    ) -> Result<(), RepositoryError> {
        materials::Entity::update_many()
            .col_expr(materials::Column::Quantity, Expr::value(quantity))
            .filter(materials::Column::Id.eq(id.into_inner()))
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_material(&self, id: MaterialId) -> Result<(), RepositoryError> {
        materials::Entity::delete_by_id(id.into_inner())
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

impl<C: ConnectionTrait + Send + Sync> PartyRepository for SeaStore<'_, C> {
    async fn find_party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        let model = parties::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await
            .map_err(db_err)?;
        model.map(Party::try_from).transpose()
    }

    async fn lock_party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        let model = parties::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(self.conn)
            .await
            .map_err(db_err)?;
        model.map(Party::try_from).transpose()
    }

    async fn list_parties(&self, filter: &PartyFilter) -> Result<Vec<Party>, RepositoryError> {
        let mut query = parties::Entity::find();
        if let Some(party_type) = filter.party_type {
            query = query.filter(parties::Column::PartyType.eq(party_type.as_str()));
        }

        query
            .order_by_asc(parties::Column::Name)
            .all(self.conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Party::try_from)
            .collect()
    }

    async fn insert_party(&self, party: &Party) -> Result<(), RepositoryError> {
        parties::Entity::insert(parties::ActiveModel::try_from(party)?)
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update_party(&self, party: &Party) -> Result<(), RepositoryError> {
        parties::ActiveModel::try_from(party)?
            .update(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_party(&self, id: PartyId) -> Result<(), RepositoryError> {
        parties::Entity::delete_by_id(id.into_inner())
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

impl<C: ConnectionTrait + Send + Sync> TransactionRepository for SeaStore<'_, C> {
    async fn find_transaction(
        &self,
        id: TransactionId,
        owner: Option<UserId>,
    ) -> Result<Option<LedgerTransaction>, RepositoryError> {
        let mut query = transactions::Entity::find_by_id(id.into_inner());
        if let Some(owner) = owner {
            query = query.filter(transactions::Column::OwnerId.eq(owner.into_inner()));
        }

        let model = query.one(self.conn).await.map_err(db_err)?;
        Ok(model.map(LedgerTransaction::try_from).transpose()?)
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        owner: Option<UserId>,
    ) -> Result<Vec<LedgerTransaction>, RepositoryError> {
        let mut query = transactions::Entity::find();
        if let Some(owner) = owner {
            query = query.filter(transactions::Column::OwnerId.eq(owner.into_inner()));
        }
        if let Some(party_id) = filter.party_id {
            query = query.filter(transactions::Column::PartyId.eq(party_id.into_inner()));
        }
        if let Some(transaction_type) = filter.transaction_type {
            query =
                query.filter(transactions::Column::TransactionType.eq(transaction_type.as_str()));
        }
        let (from, until) = filter.date_bounds();
        if let Some(from) = from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(until) = until {
            query = query.filter(transactions::Column::Date.lt(until));
        }

        let models = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_err)?;

        Ok(models
            .into_iter()
            .map(LedgerTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn ledger_entries(
        &self,
        key: LedgerKey,
    ) -> Result<Vec<LedgerTransaction>, RepositoryError> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(key.owner_id.into_inner()))
            .filter(transactions::Column::PartyId.eq(key.party_id.into_inner()))
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_err)?;

        Ok(models
            .into_iter()
            .map(LedgerTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn insert_transaction(&self, tx: &LedgerTransaction) -> Result<(), RepositoryError> {
        transactions::Entity::insert(transactions::ActiveModel::from(tx))
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update_transaction(&self, tx: &LedgerTransaction) -> Result<(), RepositoryError> {
        transactions::ActiveModel::from(tx)
            .update(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), RepositoryError> {
        transactions::Entity::delete_by_id(id.into_inner())
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn set_transaction_total(
        &self,
        id: TransactionId,
        total: Decimal,
    ) -> Result<(), RepositoryError> {
        transactions::Entity::update_many()
            .col_expr(transactions::Column::Total, Expr::value(total))
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn count_party_transactions(
        &self,
        party_id: PartyId,
        owner: Option<UserId>,
    ) -> Result<u64, RepositoryError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::PartyId.eq(party_id.into_inner()));
        if let Some(owner) = owner {
            query = query.filter(transactions::Column::OwnerId.eq(owner.into_inner()));
        }

        query.count(self.conn).await.map_err(db_err)
    }

    async fn rename_party_in_transactions(
        &self,
        party_id: PartyId,
        owner: Option<UserId>,
        name: &str,
    ) -> Result<u64, RepositoryError> {
        let mut update = transactions::Entity::update_many()
            .col_expr(transactions::Column::PartyName, Expr::value(name.to_string()))
            .filter(transactions::Column::PartyId.eq(party_id.into_inner()));
        if let Some(owner) = owner {
            update = update.filter(transactions::Column::OwnerId.eq(owner.into_inner()));
        }

        let result = update.exec(self.conn).await.map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
