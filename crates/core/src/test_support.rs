//! In-memory store implementing every repository trait, for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use fenceledger_shared::types::{MaterialId, PartyId, TransactionId, UserId};
use rust_decimal::Decimal;

use crate::auth::{Principal, UserRole};
use crate::ledger::{
    LedgerKey, LedgerTransaction, TransactionFilter, TransactionRepository, TransactionType,
};
use crate::material::{
    Material, MaterialCategory, MaterialFilter, MaterialRepository, MaterialUnit,
};
use crate::party::{Party, PartyFilter, PartyItem, PartyRepository, PartyType};
use crate::repository::RepositoryError;

/// A fresh principal with a new user ID.
pub fn principal(role: UserRole) -> Principal {
    Principal::new(UserId::new(), role)
}

#[derive(Default)]
pub struct InMemoryStore {
    materials: Mutex<HashMap<MaterialId, Material>>,
    parties: Mutex<HashMap<PartyId, Party>>,
    transactions: Mutex<HashMap<TransactionId, LedgerTransaction>>,
}

fn owned_by(owner: Option<UserId>, owner_id: UserId) -> bool {
    owner.is_none_or(|owner| owner == owner_id)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material(&self, id: MaterialId) -> Option<Material> {
        self.materials.lock().unwrap().get(&id).cloned()
    }

    pub fn party(&self, id: PartyId) -> Option<Party> {
        self.parties.lock().unwrap().get(&id).cloned()
    }

    pub fn transaction(&self, id: TransactionId) -> Option<LedgerTransaction> {
        self.transactions.lock().unwrap().get(&id).cloned()
    }

    pub fn transactions(&self) -> Vec<LedgerTransaction> {
        self.transactions.lock().unwrap().values().cloned().collect()
    }

    pub fn remove_transaction(&self, id: TransactionId) {
        self.transactions.lock().unwrap().remove(&id);
    }

    pub fn seed_material(
        &self,
        owner: UserId,
        category: MaterialCategory,
        quantity: Decimal,
    ) -> Material {
        let now = Utc::now();
        let material = Material {
            id: MaterialId::new(),
            name: format!("{category} stock"),
            category,
            unit: MaterialUnit::Kg,
            quantity,
            unit_price: Some(Decimal::TEN),
            description: None,
            low_stock_threshold: Decimal::ZERO,
            owner_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.materials
            .lock()
            .unwrap()
            .insert(material.id, material.clone());
        material
    }

    pub fn seed_party(&self, owner: UserId, name: &str) -> Party {
        let now = Utc::now();
        let party = Party {
            id: PartyId::new(),
            name: name.to_string(),
            party_type: PartyType::Supplier,
            contact: None,
            items: vec![PartyItem {
                item_name: "GI wire".to_string(),
                item_price: Decimal::ONE_HUNDRED,
            }],
            owner_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.parties.lock().unwrap().insert(party.id, party.clone());
        party
    }

    /// Inserts a money-only transaction directly, bypassing the ledger service.
    pub fn seed_transaction(
        &self,
        owner: UserId,
        party: Option<&Party>,
        kind: TransactionType,
    ) -> LedgerTransaction {
        let now = Utc::now();
        let mut tx = LedgerTransaction {
            id: TransactionId::new(),
            date: now,
            bill_no: format!("SEED-{}", TransactionId::new()),
            material_id: None,
            material_name: None,
            category: None,
            transaction_type: kind,
            quantity: Decimal::ONE,
            unit_price: Decimal::ONE_HUNDRED,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            total: Decimal::ZERO,
            party_id: party.map(|p| p.id),
            party_name: party.map(|p| p.name.clone()),
            notes: None,
            owner_id: owner,
            created_at: now,
            updated_at: now,
        };
        tx.recompute_amounts().unwrap();
        tx.total = tx.net_change();
        self.transactions.lock().unwrap().insert(tx.id, tx.clone());
        tx
    }
}

impl MaterialRepository for InMemoryStore {
    async fn find_material(
        &self,
        id: MaterialId,
        owner: Option<UserId>,
    ) -> Result<Option<Material>, RepositoryError> {
        Ok(self
            .material(id)
            .filter(|m| owned_by(owner, m.owner_id)))
    }

    async fn find_material_for_update(
        &self,
        id: MaterialId,
    ) -> Result<Option<Material>, RepositoryError> {
        Ok(self.material(id))
    }

    async fn list_materials(
        &self,
        filter: &MaterialFilter,
        owner: Option<UserId>,
    ) -> Result<Vec<Material>, RepositoryError> {
        let mut materials: Vec<Material> = self
            .materials
            .lock()
            .unwrap()
            .values()
            .filter(|m| owned_by(owner, m.owner_id))
            .filter(|m| filter.category.is_none_or(|c| m.category == c))
            .cloned()
            .collect();
        materials.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(materials)
    }

    async fn insert_material(&self, material: &Material) -> Result<(), RepositoryError> {
        self.materials
            .lock()
            .unwrap()
            .insert(material.id, material.clone());
        Ok(())
    }

    async fn update_material(&self, material: &Material) -> Result<(), RepositoryError> {
        self.insert_material(material).await
    }

    async fn set_material_quantity(
        &self,
        id: MaterialId,
        quantity: Decimal,
    ) -> Result<(), RepositoryError> {
        if let Some(material) = self.materials.lock().unwrap().get_mut(&id) {
            material.quantity = quantity;
        }
        Ok(())
    }

    async fn delete_material(&self, id: MaterialId) -> Result<(), RepositoryError> {
        self.materials.lock().unwrap().remove(&id);
        // mirrors ON DELETE SET NULL
        for tx in self.transactions.lock().unwrap().values_mut() {
            if tx.material_id == Some(id) {
                tx.material_id = None;
            }
        }
        Ok(())
    }
}

impl PartyRepository for InMemoryStore {
    async fn find_party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        Ok(self.party(id))
    }

    async fn lock_party(&self, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        Ok(self.party(id))
    }

    async fn list_parties(&self, filter: &PartyFilter) -> Result<Vec<Party>, RepositoryError> {
        let mut parties: Vec<Party> = self
            .parties
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.party_type.is_none_or(|t| p.party_type == t))
            .cloned()
            .collect();
        parties.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parties)
    }

    async fn insert_party(&self, party: &Party) -> Result<(), RepositoryError> {
        self.parties.lock().unwrap().insert(party.id, party.clone());
        Ok(())
    }

    async fn update_party(&self, party: &Party) -> Result<(), RepositoryError> {
        self.insert_party(party).await
    }

    async fn delete_party(&self, id: PartyId) -> Result<(), RepositoryError> {
        self.parties.lock().unwrap().remove(&id);
        Ok(())
    }
}

impl TransactionRepository for InMemoryStore {
    async fn find_transaction(
        &self,
        id: TransactionId,
        owner: Option<UserId>,
    ) -> Result<Option<LedgerTransaction>, RepositoryError> {
        Ok(self
            .transaction(id)
            .filter(|tx| owned_by(owner, tx.owner_id)))
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        owner: Option<UserId>,
    ) -> Result<Vec<LedgerTransaction>, RepositoryError> {
        let mut transactions: Vec<LedgerTransaction> = self
            .transactions()
            .into_iter()
            .filter(|tx| owned_by(owner, tx.owner_id) && filter.matches(tx))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(transactions)
    }

    async fn ledger_entries(
        &self,
        key: LedgerKey,
    ) -> Result<Vec<LedgerTransaction>, RepositoryError> {
        Ok(self
            .transactions()
            .into_iter()
            .filter(|tx| tx.ledger_key() == Some(key))
            .collect())
    }

    async fn insert_transaction(&self, tx: &LedgerTransaction) -> Result<(), RepositoryError> {
        self.transactions.lock().unwrap().insert(tx.id, tx.clone());
        Ok(())
    }

    async fn update_transaction(&self, tx: &LedgerTransaction) -> Result<(), RepositoryError> {
        self.insert_transaction(tx).await
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), RepositoryError> {
        self.remove_transaction(id);
        Ok(())
    }

    async fn set_transaction_total(
        &self,
        id: TransactionId,
        total: Decimal,
    ) -> Result<(), RepositoryError> {
        if let Some(tx) = self.transactions.lock().unwrap().get_mut(&id) {
            tx.total = total;
        }
        Ok(())
    }

    async fn count_party_transactions(
        &self,
        party_id: PartyId,
        owner: Option<UserId>,
    ) -> Result<u64, RepositoryError> {
        let count = self
            .transactions()
            .iter()
            .filter(|tx| tx.party_id == Some(party_id) && owned_by(owner, tx.owner_id))
            .count();
        Ok(count as u64)
    }

    async fn rename_party_in_transactions(
        &self,
        party_id: PartyId,
        owner: Option<UserId>,
        name: &str,
    ) -> Result<u64, RepositoryError> {
        let mut updated = 0;
        for tx in self.transactions.lock().unwrap().values_mut() {
            if tx.party_id == Some(party_id) && owned_by(owner, tx.owner_id) {
                tx.party_name = Some(name.to_string());
                updated += 1;
            }
        }
        Ok(updated)
    }
}
