//! Material inventory routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use fenceledger_core::material::{
    CreateMaterialInput, MaterialFilter, MaterialService, UpdateMaterialInput,
};
use fenceledger_db::SeaStore;
use fenceledger_shared::types::MaterialId;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::middleware::AuthUser;

/// Creates the material routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route(
            "/materials/{material_id}",
            get(get_material).put(update_material).delete(delete_material),
        )
}

/// GET /materials - List visible materials, newest first. `?category=` filters.
async fn list_materials(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppQuery(filter): AppQuery<MaterialFilter>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let materials = MaterialService::new(&store).list(&principal, &filter).await?;
    Ok(Json(json!({ "materials": materials })))
}

/// POST /materials - Create a material owned by the caller.
async fn create_material(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppJson(input): AppJson<CreateMaterialInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let material = MaterialService::new(&store).create(&principal, input).await?;

    info!(material_id = %material.id, category = %material.category, "material created");
    Ok((StatusCode::CREATED, Json(json!({ "material": material }))))
}

/// GET /materials/{material_id}
async fn get_material(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(material_id): AppPath<MaterialId>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let material = MaterialService::new(&store).get(&principal, material_id).await?;
    Ok(Json(json!({ "material": material })))
}

/// PUT /materials/{material_id} - Partial update.
async fn update_material(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(material_id): AppPath<MaterialId>,
    AppJson(input): AppJson<UpdateMaterialInput>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let material = MaterialService::new(&store)
        .update(&principal, material_id, input)
        .await?;

    info!(material_id = %material.id, quantity = %material.quantity, "material updated");
    Ok(Json(json!({ "material": material })))
}

/// DELETE /materials/{material_id} - Historical transactions keep their snapshot.
async fn delete_material(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(material_id): AppPath<MaterialId>,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    MaterialService::new(&store)
        .delete(&principal, material_id)
        .await?;

    info!(material_id = %material_id, "material deleted");
    Ok(Json(json!({ "message": "Material deleted successfully" })))
}
