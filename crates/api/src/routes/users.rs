//! Account routes: registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::{DateTime, Utc};
use fenceledger_core::UnknownVariant;
use fenceledger_core::auth::{UserRole, hash_password, verify_password};
use fenceledger_db::{CreateUserError, UserRepository, entities::users};
use fenceledger_shared::AppError;
use fenceledger_shared::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::AppJson;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the account router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Login email, unique.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// `admin`, `storeBoy`, or `finalBoy`.
    pub role: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// A user as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role.
    pub role: UserRole,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<users::Model> for UserResponse {
    type Error = UnknownVariant;

    fn try_from(user: users::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(user.id),
            name: user.name,
            email: user.email,
            role: user.role.parse()?,
            created_at: user.created_at.with_timezone(&Utc),
        })
    }
}

/// Login response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The authenticated user.
    pub user: UserResponse,
    /// Bearer token for `/api` routes.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// POST /users/register - Create an account. Only one admin may exist.
async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let role: UserRole = payload.role.parse()?;
    let name = required(&payload.name, "name")?;
    let email = required(&payload.email, "email")?.to_lowercase();
    if payload.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()).into());
    }

    let user_repo = UserRepository::new((*state.db).clone());

    if role.is_admin() && user_repo.admin_exists().await? {
        return Err(CreateUserError::AdminExists.into());
    }
    if user_repo.email_exists(&email).await? {
        return Err(CreateUserError::EmailTaken.into());
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo.create(&name, &email, &password_hash, role).await?;

    info!(user_id = %user.id, role = %role, "user registered");

    let user = UserResponse::try_from(user).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// POST /users/login - Verify credentials and issue a bearer token.
async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&email).await? else {
        info!(email = %email, "login attempt for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "login attempt with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
    }

    let token = state
        .jwt_service
        .generate_access_token(user.id, &user.email, &user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        user: UserResponse::try_from(user).map_err(|e| AppError::Internal(e.to_string()))?,
        token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}
