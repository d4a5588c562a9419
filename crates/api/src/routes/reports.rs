//! Report routes.

use axum::{Json, Router, extract::State, routing::get};
use fenceledger_core::reports::ReportService;
use fenceledger_db::SeaStore;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/summary", get(summary))
}

/// GET /reports/summary - Totals, stock value by category, and low-stock materials.
async fn summary(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let store = SeaStore::new(state.db.as_ref());
    let summary = ReportService::new(&store).summary(&principal).await?;
    Ok(Json(json!({ "summary": summary })))
}
