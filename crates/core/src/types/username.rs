//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is shorter than the minimum length.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("username cannot contain whitespace")]
    ContainsWhitespace,
}

/// A login name.
///
/// Usernames are the unique login identifier for an account. The rules match
/// the registration contract: at least 5 characters, at most 64, and no
/// whitespace.
///
/// ## Examples
///
/// ```
/// use userdir_core::Username;
///
/// assert!(Username::parse("alice77").is_ok());
/// assert!(Username::parse("abc").is_err());      // too short
/// assert!(Username::parse("has space").is_err()); // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 5;
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is shorter than 5 characters, longer
    /// than 64 characters, or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.chars().count() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(UsernameError::ContainsWhitespace);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Username {
    type Error = UsernameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_username() {
        let username = Username::parse("alice77").unwrap();
        assert_eq!(username.as_str(), "alice77");
    }

    #[test]
    fn accepts_exactly_minimum_length() {
        assert!(Username::parse("abcde").is_ok());
    }

    #[test]
    fn rejects_below_minimum_length() {
        assert!(matches!(
            Username::parse("abcd"),
            Err(UsernameError::TooShort { min: 5 })
        ));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(matches!(
            Username::parse("has space"),
            Err(UsernameError::ContainsWhitespace)
        ));
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
    }
}
