//! Party routes: buyers, suppliers, their item catalogs, and ledger statements.
//!
//! Parties are visible to every role. Updates and deletes are limited to the
//! creator (or an admin) and run inside one database transaction, so a rename
//! and the snapshot rewrite on its transactions commit together.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use fenceledger_core::ledger::LedgerService;
use fenceledger_core::party::{CreatePartyInput, PartyFilter, PartyService, UpdatePartyInput};
use fenceledger_db::SeaStore;
use fenceledger_shared::types::PartyId;
use sea_orm::TransactionTrait;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::middleware::AuthUser;

/// Creates the party routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parties", get(list_parties).post(create_party))
        .route(
            "/parties/{party_id}",
            get(get_party).put(update_party).delete(delete_party),
        )
        .route("/parties/{party_id}/items", get(get_party_items))
        .route("/parties/{party_id}/ledger", get(get_party_ledger))
}

/// GET /parties - All parties by name. `?type=` filters.
async fn list_parties(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    AppQuery(filter): AppQuery<PartyFilter>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let parties = PartyService::new(&store).list(&filter).await?;
    Ok(Json(json!({ "parties": parties })))
}

/// POST /parties
async fn create_party(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppJson(input): AppJson<CreatePartyInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let party = PartyService::new(&store).create(&principal, input).await?;

    info!(party_id = %party.id, party_type = %party.party_type, "party created");
    Ok((StatusCode::CREATED, Json(json!({ "party": party }))))
}

/// GET /parties/{party_id}
async fn get_party(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    AppPath(party_id): AppPath<PartyId>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let party = PartyService::new(&store).get(party_id).await?;
    Ok(Json(json!({ "party": party })))
}

/// GET /parties/{party_id}/items
async fn get_party_items(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    AppPath(party_id): AppPath<PartyId>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let items = PartyService::new(&store).items(party_id).await?;
    Ok(Json(json!({ "items": items })))
}

/// GET /parties/{party_id}/ledger - Running-balance statement in the caller's scope.
async fn get_party_ledger(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(party_id): AppPath<PartyId>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let statement = LedgerService::new(&store)
        .statement(&principal, party_id)
        .await?;
    Ok(Json(json!({ "ledger": statement })))
}

/// PUT /parties/{party_id} - Partial update; a rename reaches the caller's transactions.
async fn update_party(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(party_id): AppPath<PartyId>,
    AppJson(input): AppJson<UpdatePartyInput>,
) -> Result<Json<Value>, ApiError> {
    let txn = state.db.begin().await?;
    let store = SeaStore::new(&txn);
    let party = PartyService::new(&store)
        .update(&principal, party_id, input)
        .await?;
    txn.commit().await?;

    info!(party_id = %party.id, "party updated");
    Ok(Json(json!({ "party": party })))
}

/// DELETE /parties/{party_id} - Refused while the caller has transactions with the party.
async fn delete_party(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(party_id): AppPath<PartyId>,
) -> Result<Json<Value>, ApiError> {
    let txn = state.db.begin().await?;
    let store = SeaStore::new(&txn);
    PartyService::new(&store).delete(&principal, party_id).await?;
    txn.commit().await?;

    info!(party_id = %party_id, "party deleted");
    Ok(Json(json!({ "message": "Party deleted successfully" })))
}
