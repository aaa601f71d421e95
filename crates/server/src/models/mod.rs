//! Domain types for the service.
//!
//! These types represent validated domain objects separate from database row
//! types and request/response payloads.

pub mod account;
pub mod profile;

pub use account::Account;
pub use profile::Profile;
