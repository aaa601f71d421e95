//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret from the
//! configuration. They carry the account ID and username and are valid for
//! one hour; possession of a valid token is the only session state, nothing
//! is stored server-side.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use userdir_core::UserId;

/// Token validity window.
const TOKEN_VALIDITY_SECS: i64 = 3600;

/// Errors that can occur during token operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token's expiry is in the past.
    #[error("token expired")]
    Expired,

    /// The token was not signed with this service's secret.
    #[error("invalid signature")]
    InvalidSignature,

    /// The token is malformed or carries unusable claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in an issued token. Nothing else is included.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Account ID, as a UUID string.
    sub: String,
    /// Login name, for display without a store lookup.
    username: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// The identity a verified token decodes to.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    /// Account ID.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
}

/// Stateless token signer/verifier.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the shared signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No clock skew allowance: an expired token is expired.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for an account, valid for one hour.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        self.issue_with_expiry(user_id, username, now.timestamp() + TOKEN_VALIDITY_SECS)
    }

    /// Issue a token with an explicit expiry timestamp (seconds since epoch).
    ///
    /// Exists so tests and tooling can mint tokens at arbitrary points of
    /// their lifetime; production callers use [`Self::issue`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_with_expiry(
        &self,
        user_id: UserId,
        username: &str,
        expires_at: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_owned(),
            iat: Utc::now().timestamp(),
            exp: expires_at,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and decode the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the validity window has passed,
    /// `TokenError::InvalidSignature` if the signature does not match this
    /// service's secret, and `TokenError::Invalid` for anything else wrong
    /// with the token.
    pub fn verify(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        let user_id = UserId::parse_str(&data.claims.sub)
            .map_err(|e| TokenError::Invalid(format!("invalid subject claim: {e}")))?;

        Ok(TokenIdentity {
            user_id,
            username: data.claims.username,
        })
    }
}
