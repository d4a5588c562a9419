//! User repository for database operations.

use chrono::Utc;
use fenceledger_core::auth::UserRole;
use fenceledger_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::users;

/// Partial unique index allowing a single admin row.
const SINGLE_ADMIN_INDEX: &str = "idx_users_single_admin";

/// Errors from registering a user.
#[derive(Debug, Error)]
pub enum CreateUserError {
    /// Another account already uses the email.
    #[error("User with this email already exists")]
    EmailTaken,

    /// An admin account already exists.
    #[error("An admin account already exists")]
    AdminExists,

    /// Any other database failure.
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl CreateUserError {
    /// Classifies an insert failure by the unique index it violated.
    fn from_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                if detail.contains(SINGLE_ADMIN_INDEX) {
                    Self::AdminExists
                } else {
                    Self::EmailTaken
                }
            }
            _ => Self::Database(err),
        }
    }
}

impl From<CreateUserError> for AppError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::EmailTaken => Self::Conflict(err.to_string()),
            CreateUserError::AdminExists => Self::Forbidden(err.to_string()),
            CreateUserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// User repository for account lookups and registration.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user. The password must already be hashed.
    ///
    /// The unique indexes decide races between concurrent registrations.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if the email is already registered
    /// - `AdminExists` if `role` is admin and an admin already exists
    /// - `Database` for any other failure
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<users::Model, CreateUserError> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await.map_err(CreateUserError::from_insert)
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if an admin account has been registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn admin_exists(&self) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin.as_str()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
