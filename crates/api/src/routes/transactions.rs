//! Ledger transaction routes.
//!
//! Every mutation runs inside one database transaction: the stock change, the
//! row itself, and the replayed party totals commit or roll back together.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use fenceledger_core::ledger::{
    CreateTransactionInput, LedgerService, TransactionFilter, UpdateTransactionInput,
};
use fenceledger_db::SeaStore;
use fenceledger_shared::types::TransactionId;
use sea_orm::TransactionTrait;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::middleware::AuthUser;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// GET /transactions - Newest first. Filters: `partyId`, `type`, `startDate`, `endDate`.
async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppQuery(filter): AppQuery<TransactionFilter>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let transactions = LedgerService::new(&store).list(&principal, &filter).await?;
    Ok(Json(json!({ "transactions": transactions })))
}

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppJson(input): AppJson<CreateTransactionInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let txn = state.db.begin().await?;
    let store = SeaStore::new(&txn);
    let transaction = LedgerService::new(&store).create(&principal, input).await?;
    txn.commit().await?;

    info!(
        transaction_id = %transaction.id,
        bill_no = %transaction.bill_no,
        transaction_type = %transaction.transaction_type,
        party_id = ?transaction.party_id,
        material_id = ?transaction.material_id,
        "transaction recorded"
    );
    Ok((StatusCode::CREATED, Json(json!({ "transaction": transaction }))))
}

/// GET /transactions/{transaction_id}
async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(transaction_id): AppPath<TransactionId>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let transaction = LedgerService::new(&store)
        .get(&principal, transaction_id)
        .await?;
    Ok(Json(json!({ "transaction": transaction })))
}

/// PUT /transactions/{transaction_id} - Partial update with stock and balance correction.
async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(transaction_id): AppPath<TransactionId>,
    AppJson(input): AppJson<UpdateTransactionInput>,
) -> Result<Json<Value>, ApiError> {
    let txn = state.db.begin().await?;
    let store = SeaStore::new(&txn);
    let transaction = LedgerService::new(&store)
        .update(&principal, transaction_id, input)
        .await?;
    txn.commit().await?;

    info!(
        transaction_id = %transaction.id,
        bill_no = %transaction.bill_no,
        party_id = ?transaction.party_id,
        material_id = ?transaction.material_id,
        "transaction updated"
    );
    Ok(Json(json!({ "transaction": transaction })))
}

/// DELETE /transactions/{transaction_id} - Reverts stock and replays the party ledger.
async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(transaction_id): AppPath<TransactionId>,
) -> Result<Json<Value>, ApiError> {
    let txn = state.db.begin().await?;
    let store = SeaStore::new(&txn);
    let removed = LedgerService::new(&store)
        .delete(&principal, transaction_id)
        .await?;
    txn.commit().await?;

    info!(
        transaction_id = %removed.id,
        bill_no = %removed.bill_no,
        party_id = ?removed.party_id,
        "transaction deleted"
    );
    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
