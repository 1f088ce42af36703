//! Requester context for authorization decisions.
//!
//! These types represent the authenticated caller of a lifecycle operation.
//! They have **no transport dependencies** - the HTTP layer (JWT middleware
//! or dev headers) populates them, and internal callers such as webhook
//! handlers construct a service requester directly.

use serde::{Deserialize, Serialize};

use super::UserId;

/// The role a caller acts under within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A client booking appointments for themselves.
    Client,

    /// Staff linked to a professional record via their account email.
    Staff,

    /// Tenant administrator.
    Admin,

    /// Internal service-to-service caller (webhooks, chat adapter).
    Service,
}

/// Authenticated caller of a lifecycle operation.
#[derive(Debug, Clone)]
pub struct Requester {
    pub role: Role,

    /// The caller's user id. Present for `Client`, `Staff`, and `Admin`.
    pub user_id: Option<UserId>,

    /// The caller's account email. Staff are matched to professional
    /// records through this value.
    pub email: Option<String>,
}

impl Requester {
    /// A client acting on their own behalf.
    pub fn client(user_id: UserId) -> Self {
        Self {
            role: Role::Client,
            user_id: Some(user_id),
            email: None,
        }
    }

    /// Staff identified by their account email.
    pub fn staff(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            role: Role::Staff,
            user_id: Some(user_id),
            email: Some(email.into()),
        }
    }

    /// A tenant administrator.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            role: Role::Admin,
            user_id: Some(user_id),
            email: None,
        }
    }

    /// An internal service caller (unrestricted, like Admin).
    pub fn service() -> Self {
        Self {
            role: Role::Service,
            user_id: None,
            email: None,
        }
    }

    /// True for roles with unrestricted access to lifecycle operations.
    pub fn is_privileged(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Service)
    }
}
