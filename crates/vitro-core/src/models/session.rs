//! Per-context session state.
//!
//! A [`Session`] is a plain value owned by one interaction context. It is
//! passed into the access gate and replaced by whatever the gate returns —
//! it is never process-wide shared state, and nothing about it persists
//! across independent contexts.

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Role of an authenticated user, derived from the account's admin flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    /// Authenticated username; empty while unauthenticated.
    pub identity: String,
    /// Valid only while `authenticated` is true.
    pub role: Option<Role>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            authenticated: false,
            identity: String::new(),
            role: None,
        }
    }
}

impl Session {
    /// The initial, unauthenticated state of every new context.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// Session for a successfully verified user.
    pub fn for_user(user: &User) -> Self {
        Self {
            authenticated: true,
            identity: user.username.clone(),
            role: Some(if user.is_admin {
                Role::Admin
            } else {
                Role::Standard
            }),
        }
    }

    /// Whether this context may use administrator-only operations.
    pub fn is_admin(&self) -> bool {
        self.authenticated && self.role == Some(Role::Admin)
    }
}
