//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user account.
///
/// `username` is the identifier — there is no rename operation, and
/// accounts are never edited or deleted through the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    /// Argon2id hash in PHC string format. Never holds a plaintext
    /// password.
    pub password_hash: String,
    /// Set at creation, not mutable through any exposed operation.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub is_admin: bool,
}
