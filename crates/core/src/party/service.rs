//! Party service implementation.

use std::future::Future;

use chrono::Utc;
use fenceledger_shared::types::PartyId;
use tracing::info;

use super::error::PartyError;
use super::types::{CreatePartyInput, Party, PartyFilter, PartyItem, UpdatePartyInput};
use super::validation::{validate_items, validate_name};
use crate::auth::Principal;
use crate::ledger::TransactionRepository;
use crate::repository::RepositoryError;

/// Repository trait for party persistence.
pub trait PartyRepository: Send + Sync {
    /// Find a party by ID.
    fn find_party(
        &self,
        id: PartyId,
    ) -> impl Future<Output = Result<Option<Party>, RepositoryError>> + Send;

    /// Find a party by ID and hold a row lock on it until the surrounding
    /// database transaction ends. Ledger changes for the party serialise on this lock.
    fn lock_party(
        &self,
        id: PartyId,
    ) -> impl Future<Output = Result<Option<Party>, RepositoryError>> + Send;

    /// List parties ordered by name.
    fn list_parties(
        &self,
        filter: &PartyFilter,
    ) -> impl Future<Output = Result<Vec<Party>, RepositoryError>> + Send;

    /// Insert a new party.
    fn insert_party(&self, party: &Party)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Overwrite every mutable field of a party.
    fn update_party(&self, party: &Party)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a party.
    fn delete_party(&self, id: PartyId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Party CRUD. Needs transaction access for the rename and delete rules.
pub struct PartyService<'a, R: PartyRepository + TransactionRepository> {
    repo: &'a R,
}

impl<'a, R: PartyRepository + TransactionRepository> PartyService<'a, R> {
    /// Create a new party service.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Lists all parties, whoever created them.
    pub async fn list(&self, filter: &PartyFilter) -> Result<Vec<Party>, PartyError> {
        Ok(self.repo.list_parties(filter).await?)
    }

    /// Gets any party by ID.
    pub async fn get(&self, id: PartyId) -> Result<Party, PartyError> {
        self.repo
            .find_party(id)
            .await?
            .ok_or(PartyError::NotFound(id))
    }

    /// Returns a party's item catalog.
    pub async fn items(&self, id: PartyId) -> Result<Vec<PartyItem>, PartyError> {
        Ok(self.get(id).await?.items)
    }

    /// Creates a party owned by the caller.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreatePartyInput,
    ) -> Result<Party, PartyError> {
        let name = validate_name(&input.name)?;
        let items = validate_items(input.items)?;

        let now = Utc::now();
        let party = Party {
            id: PartyId::new(),
            name,
            party_type: input.party_type,
            contact: input.contact,
            items,
            owner_id: principal.user_id,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert_party(&party).await?;
        Ok(party)
    }

    /// Applies a partial update. A rename is copied onto the `partyName` snapshot
    /// of every transaction in the caller's scope that references the party.
    pub async fn update(
        &self,
        principal: &Principal,
        id: PartyId,
        input: UpdatePartyInput,
    ) -> Result<Party, PartyError> {
        let mut party = self.find_owned_for_update(principal, id).await?;
        let mut renamed = false;

        if let Some(name) = input.name {
            let name = validate_name(&name)?;
            renamed = name != party.name;
            party.name = name;
        }
        if let Some(party_type) = input.party_type {
            party.party_type = party_type;
        }
        if let Some(contact) = input.contact {
            party.contact = Some(contact);
        }
        if let Some(items) = input.items {
            party.items = validate_items(items)?;
        }
        party.updated_at = Utc::now();

        self.repo.update_party(&party).await?;

        if renamed {
            let updated = self
                .repo
                .rename_party_in_transactions(id, principal.owner_scope(), &party.name)
                .await?;
            info!(party_id = %id, transactions = updated, "party renamed");
        }

        Ok(party)
    }

    /// Deletes a party that no transaction in the caller's scope references.
    pub async fn delete(&self, principal: &Principal, id: PartyId) -> Result<(), PartyError> {
        self.find_owned_for_update(principal, id).await?;

        let count = self
            .repo
            .count_party_transactions(id, principal.owner_scope())
            .await?;
        if count > 0 {
            return Err(PartyError::HasTransactions { count });
        }

        self.repo.delete_party(id).await?;
        Ok(())
    }

    async fn find_owned_for_update(
        &self,
        principal: &Principal,
        id: PartyId,
    ) -> Result<Party, PartyError> {
        let party = self
            .repo
            .lock_party(id)
            .await?
            .ok_or(PartyError::NotFound(id))?;

        if let Some(owner) = principal.owner_scope()
            && party.owner_id != owner
        {
            return Err(PartyError::NotFound(id));
        }
        Ok(party)
    }
}
