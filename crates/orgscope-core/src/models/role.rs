//! Role domain model and the role hierarchy.
//!
//! Roles form a fixed total order:
//! `user < manager < client_admin < admin < owner`. Any role name the
//! directory stores that is not in this set parses as [`Role::Unknown`]
//! and ranks below every known role.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Manager,
    ClientAdmin,
    Admin,
    Owner,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Position of this role in the hierarchy; unknown roles rank `0`.
    pub fn rank(self) -> u8 {
        match self {
            Role::Unknown => 0,
            Role::User => 1,
            Role::Manager => 2,
            Role::ClientAdmin => 3,
            Role::Admin => 4,
            Role::Owner => 5,
        }
    }

    /// Whether this role meets or exceeds `required`.
    pub fn at_least(self, required: Role) -> bool {
        at_least(self, required)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::ClientAdmin => "client_admin",
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Unknown => "unknown",
        }
    }

    /// Parse a stored role name. Never fails: unrecognised names map to
    /// [`Role::Unknown`].
    pub fn from_name(name: &str) -> Role {
        match name {
            "user" => Role::User,
            "manager" => Role::Manager,
            "client_admin" => Role::ClientAdmin,
            "admin" => Role::Admin,
            "owner" => Role::Owner,
            _ => Role::Unknown,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Role::from_name(value))
    }
}

/// `rank(actual) >= rank(required)`.
pub fn at_least(actual: Role, required: Role) -> bool {
    actual.rank() >= required.rank()
}

/// Binding of an identity to a role, optionally within an organization.
///
/// Only one assignment per identity is active for a session. Platform
/// admins typically carry no `organization_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub identity_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_table() {
        assert_eq!(Role::Unknown.rank(), 0);
        assert_eq!(Role::User.rank(), 1);
        assert_eq!(Role::Manager.rank(), 2);
        assert_eq!(Role::ClientAdmin.rank(), 3);
        assert_eq!(Role::Admin.rank(), 4);
        assert_eq!(Role::Owner.rank(), 5);
    }

    #[test]
    fn ordering_checks() {
        assert!(at_least(Role::Manager, Role::User));
        assert!(!at_least(Role::User, Role::Manager));
        assert!(!at_least(Role::Admin, Role::Owner));
        assert!(at_least(Role::Owner, Role::Owner));
        assert!(!Role::Unknown.at_least(Role::User));
    }

    #[test]
    fn unknown_names_parse_as_unknown() {
        assert_eq!(Role::from_name("superuser"), Role::Unknown);
        assert_eq!("client_admin".parse::<Role>(), Ok(Role::ClientAdmin));

        let parsed: Role = serde_json::from_str("\"billing\"").unwrap();
        assert_eq!(parsed, Role::Unknown);
        let parsed: Role = serde_json::from_str("\"client_admin\"").unwrap();
        assert_eq!(parsed, Role::ClientAdmin);
    }
}
