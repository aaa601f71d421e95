//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{AccountRepository, ProfileRepository, Stores};
use crate::middleware::cache::ResponseCache;
use crate::services::TokenService;

/// Application state shared across all request handlers.
///
/// Cloning is cheap; all fields live behind a single `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    stores: Stores,
    tokens: TokenService,
    response_cache: ResponseCache,
}

impl AppState {
    /// Build state from configuration and connected stores.
    #[must_use]
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let tokens = TokenService::new(&config.token_secret);
        let response_cache = ResponseCache::new(config.cache_capacity, config.cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                tokens,
                response_cache,
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Account repository.
    #[must_use]
    pub fn accounts(&self) -> &dyn AccountRepository {
        self.inner.stores.accounts.as_ref()
    }

    /// Profile repository.
    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileRepository {
        self.inner.stores.profiles.as_ref()
    }

    /// Postgres pool, when the configured backend has one.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.stores.pool.as_ref()
    }

    /// Token signer/verifier.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Shared response cache for list/read endpoints.
    #[must_use]
    pub fn response_cache(&self) -> &ResponseCache {
        &self.inner.response_cache
    }
}
