//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::token::TokenError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more registration rules violated. Every broken rule is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The requested username is already registered.
    #[error("username already exists")]
    UsernameTaken,

    /// Login name does not match any account.
    #[error("invalid credentials")]
    UnknownUser,

    /// Password does not match the stored hash.
    #[error("invalid credentials")]
    WrongPassword,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token issuing failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
