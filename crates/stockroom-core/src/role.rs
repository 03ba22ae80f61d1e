//! Roles and the authorization predicate built on them.

use std::fmt;

/// A role as named in the `roles` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Administrator,
    Manager,
    StandardUser,
    /// A role name this build does not know about. Carries no privileges.
    Other(String),
}

impl Role {
    /// Parse a role name exactly as stored.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Administrator" => Role::Administrator,
            "Manager" => Role::Manager,
            "Standard User" => Role::StandardUser,
            other => Role::Other(other.to_string()),
        }
    }

    /// The name used in the `roles` table.
    pub fn name(&self) -> &str {
        match self {
            Role::Administrator => "Administrator",
            Role::Manager => "Manager",
            Role::StandardUser => "Standard User",
            Role::Other(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Authorization predicate: a request may proceed only if the caller's role
/// is in `allowed`.
#[derive(Debug, Clone, Copy)]
pub struct RoleGuard {
    allowed: &'static [Role],
    denial: &'static str,
}

impl RoleGuard {
    /// Managers and Administrators may add products and draw stock.
    pub const STOCK_MANAGERS: RoleGuard = RoleGuard {
        allowed: &[Role::Manager, Role::Administrator],
        denial: "Access Denied: Only Managers and Administrators can manage stock.",
    };

    pub const fn new(allowed: &'static [Role], denial: &'static str) -> Self {
        Self { allowed, denial }
    }

    pub fn permits(&self, role: &Role) -> bool {
        self.allowed.contains(role)
    }

    /// Message shown to callers the guard turns away.
    pub fn denial(&self) -> &'static str {
        self.denial
    }
}
