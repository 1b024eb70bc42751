//! Account roles.
//!
//! Roles are stored as text so that a corrupt or legacy value can be detected
//! at sign-in instead of failing row decoding. The string constants must match
//! the `ck_invitations_role` check constraint in the initial migration.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROLE_LP: &str = "lp";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "superAdmin";

/// All accepted role names.
pub const VALID_ROLES: &[&str] = &[ROLE_LP, ROLE_ADMIN, ROLE_SUPER_ADMIN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Volunteer reviewer scoped to one chapter.
    Lp,
    /// Chapter administrator.
    Admin,
    /// Cross-chapter administrator.
    SuperAdmin,
}

impl Role {
    /// Parse a stored role name. Returns `None` for anything outside [`VALID_ROLES`].
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ROLE_LP => Some(Role::Lp),
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_SUPER_ADMIN => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Lp => ROLE_LP,
            Role::Admin => ROLE_ADMIN,
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }

    /// Super admins count as admins.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }

    /// Every role except super admin is bound to a chapter.
    pub fn requires_chapter(self) -> bool {
        !self.is_super_admin()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_known_roles() {
        for name in VALID_ROLES {
            let role = Role::parse(name).expect("known role should parse");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_and_miscased() {
        assert_eq!(Role::parse("owner"), None);
        assert_eq!(Role::parse("superadmin"), None);
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_admin_flags() {
        assert!(!Role::Lp.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::Admin.is_super_admin());
        assert!(Role::Lp.requires_chapter());
        assert!(!Role::SuperAdmin.requires_chapter());
    }
}
