//! Back-office roles, the request-scoped actor, and password hashing.
//!
//! This module provides:
//! - The two-valued admin role and its capabilities
//! - `Actor`, the authenticated admin passed into every mutating call
//! - Password hashing and verification with Argon2id

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use rewards_shared::types::AdminId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Admin roles.
///
/// Anything that is not a superadmin has cashier capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Front-counter staff: add, subtract and redeem points.
    #[default]
    Cashier,
    /// Full access: balance edits, visits, customer and admin management.
    Superadmin,
}

impl AdminRole {
    /// Parses a role from free text. Unrecognized input becomes `Cashier`.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("superadmin") {
            Self::Superadmin
        } else {
            Self::Cashier
        }
    }

    /// Returns the role as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cashier => "cashier",
            Self::Superadmin => "superadmin",
        }
    }

    /// Returns true if this role may perform the given action.
    #[must_use]
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::AdjustPoints => true,
            Capability::EditBalance
            | Capability::ManageCustomers
            | Capability::ManageAdmins
            | Capability::LogVisits => matches!(self, Self::Superadmin),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-gated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Add, subtract or redeem points.
    AdjustPoints,
    /// Set a customer's balance to an absolute value.
    EditBalance,
    /// Create, update or delete customer records.
    ManageCustomers,
    /// Create, update or delete admin accounts.
    ManageAdmins,
    /// Record a customer visit.
    LogVisits,
}

impl Capability {
    /// Message shown when the actor lacks this capability.
    #[must_use]
    pub const fn denied_message(&self) -> &'static str {
        match self {
            Self::AdjustPoints => "You do not have permission to change points.",
            Self::EditBalance => "You do not have permission to edit points.",
            Self::ManageCustomers => "You do not have permission to manage customers.",
            Self::ManageAdmins => "You do not have permission to manage admins.",
            Self::LogVisits => "You do not have permission to log visits.",
        }
    }
}

/// The actor lacks the capability for an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.denied_message())]
pub struct PermissionDenied(pub Capability);

impl From<PermissionDenied> for rewards_shared::AppError {
    fn from(err: PermissionDenied) -> Self {
        Self::Forbidden(err.to_string())
    }
}

/// The authenticated admin behind a request.
///
/// Built once per request from the session and passed explicitly into every
/// ledger, visit and directory mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// Admin ID.
    pub admin_id: AdminId,
    /// Username at the time the request was authenticated.
    pub username: String,
    /// Role loaded from the store.
    pub role: AdminRole,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub fn new(admin_id: AdminId, username: impl Into<String>, role: AdminRole) -> Self {
        Self {
            admin_id,
            username: username.into(),
            role,
        }
    }

    /// Fails unless the actor's role grants the capability.
    pub fn require(&self, capability: Capability) -> Result<(), PermissionDenied> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(PermissionDenied(capability))
        }
    }

    /// Returns true for superadmins.
    #[must_use]
    pub const fn is_superadmin(&self) -> bool {
        matches!(self.role, AdminRole::Superadmin)
    }
}
