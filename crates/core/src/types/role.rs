//! Account roles gating access to back-office operations.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
///
/// Stored in the database as lowercase text (`customer`, `staff`, `admin`,
/// `super_admin`). Only admin-class roles ([`Role::is_admin_class`]) may log
/// in to the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary shopper account; never valid for back-office login.
    Customer,
    /// Limited back-office access.
    Staff,
    /// Full access to store management features.
    Admin,
    /// Full access including admin roster management.
    SuperAdmin,
}

impl Role {
    /// Whether this role may authenticate against the back-office at all.
    #[must_use]
    pub const fn is_admin_class(&self) -> bool {
        matches!(self, Self::Staff | Self::Admin | Self::SuperAdmin)
    }

    /// Whether this role may manage the admin roster.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// The database representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for role in [Role::Customer, Role::Staff, Role::Admin, Role::SuperAdmin] {
            let parsed: Role = role.as_str().parse().expect("parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn customer_is_not_admin_class() {
        assert!(!Role::Customer.is_admin_class());
        assert!(Role::Staff.is_admin_class());
        assert!(Role::Admin.is_admin_class());
        assert!(Role::SuperAdmin.is_admin_class());
    }

    #[test]
    fn only_super_admin_manages_roster() {
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(!Role::Admin.is_super_admin());
    }
}
