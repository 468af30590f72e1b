//! Account roles.
//!
//! The database stores role names as TEXT (constrained by a CHECK); this
//! module owns the matching tagged type so handlers and gate functions
//! never compare raw strings. The string constants must match the CHECK
//! constraint in `20260301000001_create_users_table.sql`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_LAWYER: &str = "lawyer";
pub const ROLE_CITIZEN: &str = "citizen";

/// A user's role. Exactly one per account; mutable only via admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lawyer,
    Citizen,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Lawyer => ROLE_LAWYER,
            Role::Citizen => ROLE_CITIZEN,
        }
    }

    /// Parse a role name as stored in the database or a JWT claim.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_LAWYER => Some(Role::Lawyer),
            ROLE_CITIZEN => Some(Role::Citizen),
            _ => None,
        }
    }

    /// Only citizens create, submit, and support petitions.
    pub fn is_citizen(self) -> bool {
        self == Role::Citizen
    }

    /// Admins moderate evidence and review petitions.
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Lawyers publish consultation slots and confirm bookings.
    pub fn is_lawyer(self) -> bool {
        self == Role::Lawyer
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
    fn test_parse_roundtrip() {
        for role in [Role::Admin, Role::Lawyer, Role::Citizen] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(Role::parse("moderator"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_capabilities_are_exclusive() {
        assert!(Role::Citizen.is_citizen() && !Role::Citizen.is_admin());
        assert!(Role::Admin.is_admin() && !Role::Admin.is_lawyer());
        assert!(Role::Lawyer.is_lawyer() && !Role::Lawyer.is_citizen());
    }
}
