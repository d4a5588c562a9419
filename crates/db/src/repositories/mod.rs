//! Repository implementations for database access.

pub mod store;
pub mod user;

pub use store::SeaStore;
pub use user::{CreateUserError, UserRepository};
