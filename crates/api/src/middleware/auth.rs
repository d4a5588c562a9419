//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use fenceledger_core::UnknownVariant;
use fenceledger_core::auth::{Principal, UserRole};
use fenceledger_db::UserRepository;
use fenceledger_shared::types::UserId;
use fenceledger_shared::{AppError, JwtError};

use crate::AppState;
use crate::error::ApiError;

/// Authentication middleware that resolves the caller.
///
/// This middleware:
/// 1. Reads the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Loads the user, so deleted accounts and role changes take effect immediately
/// 4. Stores a `Principal` in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let Some(bearer) = headers.typed_get::<Authorization<Bearer>>() else {
        return Err(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        )
        .into());
    };

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| match e {
            JwtError::Expired => AppError::Unauthorized("Token has expired".to_string()),
            _ => AppError::Unauthorized("Invalid or malformed token".to_string()),
        })?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let role: UserRole = user
        .role
        .parse()
        .map_err(|e: UnknownVariant| AppError::Internal(e.to_string()))?;

    Ok(Principal::new(UserId::from_uuid(user.id), role))
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(AuthUser(principal): AuthUser) -> impl IntoResponse {
///     let scope = principal.owner_scope();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}
