//! Roles, authenticated principals, and password hashing.
//!
//! Role strings are mapped to [`UserRole`] at the boundary only; everything
//! past the API layer works with the enum.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use std::str::FromStr;

use fenceledger_shared::types::UserId;
use serde::{Deserialize, Serialize};

use crate::variant::UnknownVariant;

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    /// Sees and edits everything, bypasses ownership filters.
    Admin,
    /// Store keeper: may not touch Final category materials.
    StoreBoy,
    /// Finished goods handler.
    FinalBoy,
}

impl UserRole {
    /// Canonical wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::StoreBoy => "storeBoy",
            Self::FinalBoy => "finalBoy",
        }
    }

    /// Human-facing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::StoreBoy => "StoreBoy",
            Self::FinalBoy => "FinalBoy",
        }
    }

    /// Returns true if this role bypasses ownership filters.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role may create, modify, or delete Final category materials.
    #[must_use]
    pub const fn can_handle_final_goods(self) -> bool {
        !matches!(self, Self::StoreBoy)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    /// Accepts the canonical form and the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" | "Admin" => Ok(Self::Admin),
            "storeBoy" | "StoreBoy" => Ok(Self::StoreBoy),
            "finalBoy" | "FinalBoy" => Ok(Self::FinalBoy),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

/// A verified caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's role as currently stored.
    pub role: UserRole,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Returns true if the caller is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Ownership filter for scoped records: `None` means every owner is visible.
    #[must_use]
    pub const fn owner_scope(&self) -> Option<UserId> {
        if self.role.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case("Admin", UserRole::Admin)]
    #[case("storeBoy", UserRole::StoreBoy)]
    #[case("StoreBoy", UserRole::StoreBoy)]
    #[case("finalBoy", UserRole::FinalBoy)]
    #[case("FinalBoy", UserRole::FinalBoy)]
    fn test_role_parses_both_forms(#[case] input: &str, #[case] expected: UserRole) {
        assert_eq!(input.parse::<UserRole>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "manager".parse::<UserRole>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid role: manager");
        assert!("ADMIN".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_canonically() {
        assert_eq!(
            serde_json::to_string(&UserRole::StoreBoy).unwrap(),
            "\"storeBoy\""
        );
        assert_eq!(UserRole::FinalBoy.to_string(), "finalBoy");
        assert_eq!(UserRole::FinalBoy.display_name(), "FinalBoy");
    }

    #[test]
    fn test_final_goods_permission() {
        assert!(UserRole::Admin.can_handle_final_goods());
        assert!(UserRole::FinalBoy.can_handle_final_goods());
        assert!(!UserRole::StoreBoy.can_handle_final_goods());
    }

    #[test]
    fn test_owner_scope() {
        let user = UserId::new();
        assert_eq!(Principal::new(user, UserRole::Admin).owner_scope(), None);
        assert_eq!(
            Principal::new(user, UserRole::StoreBoy).owner_scope(),
            Some(user)
        );
        assert_eq!(
            Principal::new(user, UserRole::FinalBoy).owner_scope(),
            Some(user)
        );
    }
}
