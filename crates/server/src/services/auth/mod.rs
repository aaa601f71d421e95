//! Authentication service.
//!
//! Registration and login over the account repository. Passwords are hashed
//! with argon2id and a per-password random salt; login issues a bearer token
//! via the [`TokenService`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use userdir_core::{Email, UserId, Username};

use crate::db::{AccountRepository, NewAccount, RepositoryError};
use crate::models::Account;
use crate::services::token::TokenService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    accounts: &'a dyn AccountRepository,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(accounts: &'a dyn AccountRepository, tokens: &'a TokenService) -> Self {
        Self { accounts, tokens }
    }

    /// Register a new account.
    ///
    /// All validation rules are checked before any store access, and every
    /// violated rule is reported, not just the first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing the violated rules,
    /// `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let (username, email) = validate_registration(username, email, password)?;

        // Check uniqueness up front for a clean error; the store still
        // enforces it at write time, which covers the race.
        if self.accounts.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create(NewAccount {
                id: UserId::generate(),
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(account)
    }

    /// Login with username and password, issuing a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUser` if the username does not match an
    /// account, `AuthError::WrongPassword` if the password does not match
    /// the stored hash.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        // A name that can't parse can't be registered either.
        let username = Username::parse(username).map_err(|_| AuthError::UnknownUser)?;

        let account = self
            .accounts
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        verify_password(password, &account.password_hash)?;

        let token = self.tokens.issue(account.id, account.username.as_str())?;
        Ok(token)
    }
}

/// Check all registration rules, collecting every violation.
fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(Username, Email), AuthError> {
    let mut violations = Vec::new();

    let username = Username::parse(username)
        .map_err(|_| {
            violations.push(format!(
                "Username must be at least {} characters",
                Username::MIN_LENGTH
            ));
        })
        .ok();

    let email = Email::parse(email)
        .map_err(|_| violations.push("Invalid Email".to_owned()))
        .ok();

    if password.len() < MIN_PASSWORD_LENGTH {
        violations.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }

    match (username, email) {
        (Some(username), Some(email)) if violations.is_empty() => Ok((username, email)),
        _ => Err(AuthError::Validation(violations)),
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::WrongPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::WrongPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use crate::db::memory::InMemoryAccountRepository;

    use super::*;

    fn tokens() -> TokenService {
        TokenService::new(&SecretString::from("k9#mQ2$vX8@pL4!wZ7&nB3*jF6^hT1%d"))
    }

    #[tokio::test]
    async fn register_reports_every_violated_rule() {
        let accounts = InMemoryAccountRepository::new();
        let tokens = tokens();
        let auth = AuthService::new(&accounts, &tokens);

        let err = auth.register("ab", "not-an-email", "short").await.unwrap_err();
        let AuthError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 3);

        // Nothing was persisted.
        let lookup = accounts
            .find_by_username(&Username::parse("valid-name").unwrap())
            .await
            .unwrap();
        assert!(lookup.is_none());
    }

    #[tokio::test]
    async fn register_then_login_round_trips_identity() {
        let accounts = InMemoryAccountRepository::new();
        let tokens = tokens();
        let auth = AuthService::new(&accounts, &tokens);

        let account = auth
            .register("alice77", "alice@example.com", "correct horse battery")
            .await
            .unwrap();

        let token = auth.login("alice77", "correct horse battery").await.unwrap();
        let identity = tokens.verify(&token).unwrap();

        assert_eq!(identity.user_id, account.id);
        assert_eq!(identity.username, "alice77");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let accounts = InMemoryAccountRepository::new();
        let tokens = tokens();
        let auth = AuthService::new(&accounts, &tokens);

        auth.register("alice77", "alice@example.com", "password-one")
            .await
            .unwrap();

        let err = auth
            .register("alice77", "other@example.com", "password-two")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_user_from_wrong_password() {
        let accounts = InMemoryAccountRepository::new();
        let tokens = tokens();
        let auth = AuthService::new(&accounts, &tokens);

        auth.register("alice77", "alice@example.com", "correct horse battery")
            .await
            .unwrap();

        assert!(matches!(
            auth.login("nobody77", "whatever!").await.unwrap_err(),
            AuthError::UnknownUser
        ));
        assert!(matches!(
            auth.login("alice77", "wrong password").await.unwrap_err(),
            AuthError::WrongPassword
        ));
    }

    #[test]
    fn stored_hash_is_not_the_plaintext() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!hash.contains("correct horse battery"));
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
    }
}
