//! JSON error envelope for every failed request.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fenceledger_core::auth::PasswordError;
use fenceledger_core::ledger::LedgerError;
use fenceledger_core::material::MaterialError;
use fenceledger_core::party::PartyError;
use fenceledger_core::reports::ReportError;
use fenceledger_core::{RepositoryError, UnknownVariant};
use fenceledger_db::CreateUserError;
use fenceledger_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// An `AppError` rendered as `{"error": message, "code": CODE}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = Json(json!({
            "error": self.0.message(),
            "code": self.0.error_code(),
        }));
        (status, body).into_response()
    }
}

macro_rules! via_app_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(err.into())
                }
            }
        )*
    };
}

via_app_error!(
    AppError,
    MaterialError,
    PartyError,
    LedgerError,
    ReportError,
    RepositoryError,
    CreateUserError,
    PasswordError,
    UnknownVariant,
);

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}
