//! `SeaORM` entity definitions.
//!
//! Enum-valued columns are stored as text and parsed on the way out, so a
//! row holding an unknown variant surfaces as a corrupt-record error rather
//! than a panic.

pub mod materials;
pub mod parties;
pub mod transactions;
pub mod users;

pub mod prelude {
    //! Entity re-exports.

    pub use super::materials::Entity as Materials;
    pub use super::parties::Entity as Parties;
    pub use super::transactions::Entity as Transactions;
    pub use super::users::Entity as Users;
}
