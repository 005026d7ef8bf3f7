//! Identity and role contracts.
//!
//! The engine does not authenticate anyone; it receives the acting
//! [`Principal`] from the host's session layer and applies role and
//! ownership checks against it.

use serde::{Deserialize, Serialize};

use teamcal_core::UserId;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May create, edit, and delete events.
    Admin,
    /// May only respond to invitations on their own copies.
    #[default]
    Member,
}

impl Role {
    /// Returns true if this role may create, edit, or delete events.
    pub fn can_manage_events(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user's directory id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role gating event management.
    pub role: Role,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

/// Source of the current session's principal.
pub trait IdentityProvider {
    /// Returns the currently authenticated user.
    fn current_user(&self) -> Principal;
}

/// An identity provider that always yields one fixed principal.
///
/// Suitable for tests and for hosts that resolve the session out of band.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Principal);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Principal {
        self.0.clone()
    }
}
