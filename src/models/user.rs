//! User account models.
//!
//! [`UserAccount`] is the stored credential record. [`UserProfile`] is the
//! view of it that is safe to hand to callers, without the password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique login name.
    pub username: String,
    /// Encoded salted password hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Whether the user may manage other users.
    pub is_admin: bool,
    /// Inactive users cannot authenticate.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Returns true for an admin that can still log in.
    pub fn is_active_admin(&self) -> bool {
        self.is_admin && self.active
    }
}

/// Public view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Whether the user may manage other users.
    pub is_admin: bool,
    /// Whether the account is active.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for UserProfile {
    fn from(account: &UserAccount) -> Self {
        UserProfile {
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            is_admin: account.is_admin,
            active: account.active,
            created_at: account.created_at,
        }
    }
}
