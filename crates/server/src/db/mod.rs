//! Repository layer.
//!
//! One repository abstraction, two backends:
//!
//! - [`accounts::PgAccountRepository`] / [`profiles::PgProfileRepository`] -
//!   durable `PostgreSQL` storage via sqlx
//! - [`memory`] - volatile in-process storage behind `tokio::sync::RwLock`,
//!   used by the `memory` backend and as the test double
//!
//! The backend is selected once at startup from [`StoreBackend`]; handlers
//! only ever see the trait objects in [`Stores`].
//!
//! # Tables (postgres backend)
//!
//! - `account` - registration credentials (username, email, password hash)
//! - `user_profile` - profile records
//!
//! Migrations live in `crates/server/migrations/` and are applied with psql
//! or any migration runner; they are not run automatically on startup.

pub mod accounts;
pub mod memory;
pub mod profiles;

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::{AppConfig, StoreBackend};

pub use accounts::{AccountRepository, NewAccount};
pub use profiles::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, NewProfile, ProfileChanges, ProfileListQuery,
    ProfileRepository, SortField, SortOrder,
};

/// Errors returned by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username or email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Errors that can occur while connecting the store at startup.
#[derive(Debug, thiserror::Error)]
pub enum StoreInitError {
    /// The postgres backend was selected but no connection URL was provided.
    #[error("postgres backend selected but DATABASE_URL is not configured")]
    MissingDatabaseUrl,

    /// The database connection could not be established.
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// The repositories handlers operate on, plus the pool for readiness checks.
#[derive(Clone)]
pub struct Stores {
    /// Account credential store.
    pub accounts: Arc<dyn AccountRepository>,
    /// Profile store.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Connection pool, present only for the postgres backend.
    pub pool: Option<PgPool>,
}

impl Stores {
    /// Build stores backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(accounts::PgAccountRepository::new(pool.clone())),
            profiles: Arc::new(profiles::PgProfileRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Build volatile in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(memory::InMemoryAccountRepository::new()),
            profiles: Arc::new(memory::InMemoryProfileRepository::new()),
            pool: None,
        }
    }
}

/// Connect the store selected by the configuration.
///
/// For the postgres backend this establishes the connection pool eagerly so
/// that an unreachable database fails startup immediately.
///
/// # Errors
///
/// Returns `StoreInitError` if the postgres backend is selected without a
/// `DATABASE_URL` or if the connection cannot be established.
pub async fn connect(config: &AppConfig) -> Result<Stores, StoreInitError> {
    match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_ref()
                .ok_or(StoreInitError::MissingDatabaseUrl)?;
            let pool = create_pool(url).await?;
            Ok(Stores::postgres(pool))
        }
        StoreBackend::Memory => Ok(Stores::in_memory()),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
