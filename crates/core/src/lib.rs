//! userdir Core - Shared domain types.
//!
//! This crate provides the validated domain primitives used across the
//! userdir service:
//!
//! - [`Email`] - a structurally valid email address
//! - [`Username`] - a login name meeting the registration rules
//! - [`UserId`] / [`ProfileId`] - type-safe UUID wrappers
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Validation happens once at the boundary (`parse` constructors); everything
//! downstream can rely on the invariants holding.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
