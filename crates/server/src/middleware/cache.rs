//! Read-through response cache for GET endpoints.
//!
//! Successful GET responses are stored, keyed by path and query string, and
//! replayed for the cache's time-to-live. Contract:
//!
//! - Only `GET` requests participate; every other method passes through.
//! - Only `200 OK` responses are stored.
//! - Entries expire after the configured TTL and are also bounded by a
//!   maximum capacity, with least-recently-used entries evicted first.
//! - Mutations do not invalidate entries; readers may see data up to one
//!   TTL stale.
//!
//! A cache hit carries an `x-cache: HIT` header so staleness is observable
//! from the outside.

use std::time::Duration;

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use moka::sync::Cache;

use crate::state::AppState;

static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Upper bound on a cached body. Larger responses pass through uncached.
const MAX_CACHED_BODY_BYTES: usize = 1024 * 1024;

/// A stored response: status plus body bytes.
#[derive(Clone)]
struct CachedResponse {
    status: StatusCode,
    body: Bytes,
}

/// Shared TTL+capacity bounded response cache.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedResponse>,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` responses, each for `ttl`.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key)
    }

    fn insert(&self, key: String, response: CachedResponse) {
        self.entries.insert(key, response);
    }
}

/// Replay a stored response body as JSON with a cache marker header.
fn replay(cached: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    *response.status_mut() = cached.status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
        .headers_mut()
        .insert(X_CACHE.clone(), HeaderValue::from_static("HIT"));
    response
}

/// Axum middleware serving GET responses from the shared cache.
///
/// Attach with `axum::middleware::from_fn_with_state`; non-GET requests are
/// forwarded untouched.
pub async fn cache_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), ToString::to_string);

    if let Some(cached) = state.response_cache().get(&key) {
        return replay(cached);
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    // Buffer the body so it can be both stored and returned.
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    state.response_cache().insert(
        key,
        CachedResponse {
            status: parts.status,
            body: bytes.clone(),
        },
    );

    let mut response = Response::from_parts(parts, Body::from(bytes));
    response
        .headers_mut()
        .insert(X_CACHE.clone(), HeaderValue::from_static("MISS"));
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn expired_entries_are_not_returned() {
        let cache = ResponseCache::new(16, Duration::from_millis(50));
        cache.insert(
            "/users?page=1".to_owned(),
            CachedResponse {
                status: StatusCode::OK,
                body: Bytes::from_static(b"[]"),
            },
        );

        assert!(cache.get("/users?page=1").is_some());
        std::thread::sleep(Duration::from_millis(80));
        cache.entries.run_pending_tasks();
        assert!(cache.get("/users?page=1").is_none());
    }

    #[test]
    fn keys_include_the_query_string() {
        let cache = ResponseCache::new(16, Duration::from_secs(10));
        cache.insert(
            "/users?page=1".to_owned(),
            CachedResponse {
                status: StatusCode::OK,
                body: Bytes::from_static(b"[]"),
            },
        );

        assert!(cache.get("/users?page=2").is_none());
    }
}
