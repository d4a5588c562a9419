//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod health;
pub mod materials;
pub mod parties;
pub mod reports;
pub mod transactions;
pub mod users;

/// Creates the router: public health and account routes, and the
/// authenticated resource routes under `/api`.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(materials::routes())
        .merge(parties::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .nest("/api", protected_routes)
}
