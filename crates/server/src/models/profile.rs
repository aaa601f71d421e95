//! Profile domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use userdir_core::{Email, ProfileId};

/// A user profile record (domain type).
///
/// Profiles are independent of accounts: they are keyed by their own ID and
/// carry no reference to the account that created them.
///
/// Serializes in the API's camelCase wire shape, so this type doubles as the
/// response body for the profile endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique profile ID.
    pub id: ProfileId,
    /// Display name. Never empty.
    pub name: String,
    /// Contact email address.
    pub email: Email,
    /// Optional phone number, stored verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}
