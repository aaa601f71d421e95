//! Account domain type.

use chrono::{DateTime, Utc};

use userdir_core::{Email, UserId, Username};

/// A registered account (domain type).
///
/// Created on registration and never mutated afterwards within this service.
/// The password is stored only as an argon2 hash; the plaintext never leaves
/// the registration or login handler.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Argon2 hash of the password.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
