//! Ledger service: transaction lifecycle, stock side effects, and balance rebuilds.
//!
//! Callers run each mutation inside one database transaction over a repository
//! that implements all three store traits. Row locks are always taken parties
//! first, then materials, so two mutations cannot wait on each other.

use std::future::Future;

use chrono::Utc;
use fenceledger_shared::types::{MaterialId, PartyId, TransactionId, UserId};
use rust_decimal::Decimal;
use tracing::debug;

use super::balance::replay;
use super::bill_no::next_bill_no;
use super::error::LedgerError;
use super::types::{
    CreateTransactionInput, LedgerKey, LedgerTransaction, PartyStatement, TransactionFilter,
    UpdateTransactionInput,
};
use crate::amount::fits_storage;
use crate::auth::Principal;
use crate::material::{Material, MaterialRepository, apply_stock_delta};
use crate::party::{Party, PartyRepository};
use crate::repository::RepositoryError;

/// Repository trait for transaction persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// `owner` is the ownership filter; `None` matches every owner.
pub trait TransactionRepository: Send + Sync {
    /// Find a transaction by ID within an ownership scope.
    fn find_transaction(
        &self,
        id: TransactionId,
        owner: Option<UserId>,
    ) -> impl Future<Output = Result<Option<LedgerTransaction>, RepositoryError>> + Send;

    /// List transactions, newest date first.
    fn list_transactions(
        &self,
        filter: &TransactionFilter,
        owner: Option<UserId>,
    ) -> impl Future<Output = Result<Vec<LedgerTransaction>, RepositoryError>> + Send;

    /// All entries of one party ledger, in any order.
    fn ledger_entries(
        &self,
        key: LedgerKey,
    ) -> impl Future<Output = Result<Vec<LedgerTransaction>, RepositoryError>> + Send;

    /// Insert a new transaction.
    fn insert_transaction(
        &self,
        tx: &LedgerTransaction,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Overwrite every mutable field of a transaction.
    fn update_transaction(
        &self,
        tx: &LedgerTransaction,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a transaction.
    fn delete_transaction(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Store a recomputed running total.
    fn set_transaction_total(
        &self,
        id: TransactionId,
        total: Decimal,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Count transactions referencing a party.
    fn count_party_transactions(
        &self,
        party_id: PartyId,
        owner: Option<UserId>,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Rewrite the party name snapshot; returns the number of rows touched.
    fn rename_party_in_transactions(
        &self,
        party_id: PartyId,
        owner: Option<UserId>,
        name: &str,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Transaction lifecycle over a store that holds materials, parties, and transactions.
pub struct LedgerService<'a, R>
where
    R: TransactionRepository + MaterialRepository + PartyRepository,
{
    repo: &'a R,
}

impl<'a, R> LedgerService<'a, R>
where
    R: TransactionRepository + MaterialRepository + PartyRepository,
{
    /// Create a new ledger service.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Lists transactions visible to the caller, newest first.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &TransactionFilter,
    ) -> Result<Vec<LedgerTransaction>, LedgerError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
            && start > end
        {
            return Err(LedgerError::InvalidDateRange);
        }
        Ok(self
            .repo
            .list_transactions(filter, principal.owner_scope())
            .await?)
    }

    /// Gets one transaction visible to the caller.
    pub async fn get(
        &self,
        principal: &Principal,
        id: TransactionId,
    ) -> Result<LedgerTransaction, LedgerError> {
        self.repo
            .find_transaction(id, principal.owner_scope())
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Records a transaction.
    ///
    /// Purchase adds the quantity to the material's stock and Sale removes it
    /// (floored at zero). The party ledger is replayed afterwards, so a
    /// back-dated entry also corrects every later total.
    ///
    /// # Errors
    ///
    /// - `NonPositiveQuantity` / `NegativeUnitPrice` on bad amounts
    /// - `OutOfRange` when a value, the amount, the stock, or a running total
    ///   would not be stored exactly
    /// - `MaterialRequired` for Purchase or Sale without a material
    /// - `MaterialNotFound` / `PartyNotFound` for unresolved references
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateTransactionInput,
    ) -> Result<LedgerTransaction, LedgerError> {
        validate_amounts(input.quantity, input.unit_price)?;
        let kind = input.transaction_type;

        let material_id = if kind.moves_stock() {
            Some(input.material_id.ok_or(LedgerError::MaterialRequired(kind))?)
        } else {
            None
        };

        let party = match input.party_id {
            Some(id) => Some(self.lock_party(id).await?),
            None => None,
        };
        let material = match material_id {
            Some(id) => Some(self.lock_material_in_scope(principal, id).await?),
            None => None,
        };

        let now = Utc::now();
        let mut tx = LedgerTransaction {
            id: TransactionId::new(),
            date: input.date.unwrap_or(now),
            bill_no: next_bill_no(),
            material_id,
            material_name: material.as_ref().map(|m| m.name.clone()),
            category: material.as_ref().map(|m| m.category),
            transaction_type: kind,
            quantity: input.quantity,
            unit_price: input.unit_price,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            total: Decimal::ZERO,
            party_id: party.as_ref().map(|p| p.id),
            party_name: party.map(|p| p.name),
            notes: input.notes,
            owner_id: principal.user_id,
            created_at: now,
            updated_at: now,
        };
        tx.recompute_amounts()?;
        tx.total = tx.net_change();

        if let (Some(material), Some(delta)) = (material, kind.stock_delta(tx.quantity)) {
            let quantity = apply_stock_delta(material.quantity, delta)
                .ok_or(LedgerError::OutOfRange("stock"))?;
            self.repo.set_material_quantity(material.id, quantity).await?;
        }

        self.repo.insert_transaction(&tx).await?;

        if let Some(key) = tx.ledger_key() {
            self.rebuild_into(key, &mut tx).await?;
        }
        Ok(tx)
    }

    /// Applies a partial update.
    ///
    /// The old stock effect is reverted and the new one applied. Material and
    /// party snapshots are refreshed only when the reference changes. Both the
    /// old and the new party ledger are replayed.
    pub async fn update(
        &self,
        principal: &Principal,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> Result<LedgerTransaction, LedgerError> {
        let existing = self.get(principal, id).await?;

        let mut party_ids: Vec<PartyId> =
            existing.party_id.into_iter().chain(input.party_id).collect();
        party_ids.sort();
        party_ids.dedup();
        let mut new_party = None;
        for party_id in party_ids {
            let locked = self.repo.lock_party(party_id).await?;
            if input.party_id == Some(party_id) {
                new_party = Some(locked.ok_or(LedgerError::PartyNotFound(party_id))?);
            }
        }

        let mut tx = existing.clone();
        if let Some(date) = input.date {
            tx.date = date;
        }
        if let Some(kind) = input.transaction_type {
            tx.transaction_type = kind;
        }
        if let Some(quantity) = input.quantity {
            tx.quantity = quantity;
        }
        if let Some(unit_price) = input.unit_price {
            tx.unit_price = unit_price;
        }
        if let Some(notes) = input.notes {
            tx.notes = Some(notes);
        }
        validate_amounts(tx.quantity, tx.unit_price)?;

        if tx.transaction_type.moves_stock() {
            if let Some(material_id) = input.material_id
                && tx.material_id != Some(material_id)
            {
                let material = self.find_material_in_scope(principal, material_id).await?;
                tx.material_id = Some(material.id);
                tx.material_name = Some(material.name);
                tx.category = Some(material.category);
            }
            if tx.material_id.is_none() {
                return Err(LedgerError::MaterialRequired(tx.transaction_type));
            }
        } else {
            tx.material_id = None;
            tx.material_name = None;
            tx.category = None;
        }

        if let Some(party) = new_party
            && tx.party_id != Some(party.id)
        {
            tx.party_id = Some(party.id);
            tx.party_name = Some(party.name);
        }

        tx.recompute_amounts()?;
        if tx.party_id.is_none() {
            tx.total = tx.net_change();
        }
        tx.updated_at = Utc::now();

        if let Some((material_id, delta)) = existing.stock_effect() {
            self.shift_stock(material_id, -delta).await?;
        }
        if let Some((material_id, delta)) = tx.stock_effect() {
            self.shift_stock(material_id, delta).await?;
        }

        self.repo.update_transaction(&tx).await?;

        if let Some(old_key) = existing.ledger_key()
            && tx.ledger_key() != Some(old_key)
        {
            self.rebuild(old_key).await?;
        }
        if let Some(key) = tx.ledger_key() {
            self.rebuild_into(key, &mut tx).await?;
        }
        Ok(tx)
    }

    /// Deletes a transaction, reverting its stock effect and replaying its
    /// party ledger. Returns the removed record.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: TransactionId,
    ) -> Result<LedgerTransaction, LedgerError> {
        let existing = self.get(principal, id).await?;

        if let Some(party_id) = existing.party_id {
            self.repo.lock_party(party_id).await?;
        }
        if let Some((material_id, delta)) = existing.stock_effect() {
            self.shift_stock(material_id, -delta).await?;
        }

        self.repo.delete_transaction(id).await?;

        if let Some(key) = existing.ledger_key() {
            self.rebuild(key).await?;
        }
        Ok(existing)
    }

    /// Builds the caller's statement for a party.
    ///
    /// Totals are replayed over exactly the visible entries; for an admin that
    /// spans every owner's ledger for the party.
    pub async fn statement(
        &self,
        principal: &Principal,
        party_id: PartyId,
    ) -> Result<PartyStatement, LedgerError> {
        let party = self
            .repo
            .find_party(party_id)
            .await?
            .ok_or(LedgerError::PartyNotFound(party_id))?;

        let mut entries = self
            .repo
            .list_transactions(
                &TransactionFilter::for_party(party_id),
                principal.owner_scope(),
            )
            .await?;
        replay(&mut entries)?;

        let total_debit = entries.iter().map(|e| e.debit).sum();
        let total_credit = entries.iter().map(|e| e.credit).sum();
        let balance = entries.last().map_or(Decimal::ZERO, |e| e.total);

        Ok(PartyStatement {
            party_id,
            party_name: party.name,
            entries,
            total_debit,
            total_credit,
            balance,
        })
    }

    /// Replays one party ledger and persists every total that changed.
    pub async fn rebuild(&self, key: LedgerKey) -> Result<Vec<LedgerTransaction>, LedgerError> {
        let mut entries = self.repo.ledger_entries(key).await?;
        let changed = replay(&mut entries)?;

        for (id, total) in &changed {
            self.repo.set_transaction_total(*id, *total).await?;
        }

        debug!(
            party_id = %key.party_id,
            owner_id = %key.owner_id,
            entries = entries.len(),
            changed = changed.len(),
            "party ledger rebuilt"
        );
        Ok(entries)
    }

    async fn rebuild_into(
        &self,
        key: LedgerKey,
        tx: &mut LedgerTransaction,
    ) -> Result<(), LedgerError> {
        let entries = self.rebuild(key).await?;
        if let Some(entry) = entries.iter().find(|e| e.id == tx.id) {
            tx.total = entry.total;
        }
        Ok(())
    }

    async fn lock_party(&self, id: PartyId) -> Result<Party, LedgerError> {
        self.repo
            .lock_party(id)
            .await?
            .ok_or(LedgerError::PartyNotFound(id))
    }

    async fn lock_material_in_scope(
        &self,
        principal: &Principal,
        id: MaterialId,
    ) -> Result<Material, LedgerError> {
        let material = self
            .repo
            .find_material_for_update(id)
            .await?
            .ok_or(LedgerError::MaterialNotFound(id))?;

        if let Some(owner) = principal.owner_scope()
            && material.owner_id != owner
        {
            return Err(LedgerError::MaterialNotFound(id));
        }
        Ok(material)
    }

    async fn find_material_in_scope(
        &self,
        principal: &Principal,
        id: MaterialId,
    ) -> Result<Material, LedgerError> {
        self.repo
            .find_material(id, principal.owner_scope())
            .await?
            .ok_or(LedgerError::MaterialNotFound(id))
    }

    /// Moves stock on a material if it still exists.
    async fn shift_stock(&self, id: MaterialId, delta: Decimal) -> Result<(), LedgerError> {
        if let Some(material) = self.repo.find_material_for_update(id).await? {
            let quantity = apply_stock_delta(material.quantity, delta)
                .ok_or(LedgerError::OutOfRange("stock"))?;
            self.repo.set_material_quantity(id, quantity).await?;
        }
        Ok(())
    }
}

fn validate_amounts(quantity: Decimal, unit_price: Decimal) -> Result<(), LedgerError> {
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveQuantity);
    }
    if unit_price < Decimal::ZERO {
        return Err(LedgerError::NegativeUnitPrice);
    }
    if !fits_storage(quantity) {
        return Err(LedgerError::OutOfRange("quantity"));
    }
    if !fits_storage(unit_price) {
        return Err(LedgerError::OutOfRange("unitPrice"));
    }
    Ok(())
}
