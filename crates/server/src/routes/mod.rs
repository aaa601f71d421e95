//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health           - Liveness check
//! GET    /health/ready     - Readiness check (verifies store connectivity)
//! GET    /openapi.json     - OpenAPI 3.0 description of the API
//!
//! # Auth (rate limited ~10/min per IP)
//! POST   /auth/register    - Create an account
//! POST   /auth/login       - Exchange credentials for a bearer token
//!
//! # User profiles (bearer token required, rate limited ~100/min per IP)
//! POST   /users            - Create a profile
//! GET    /users            - List profiles (paginated, sorted, cached)
//! GET    /users/{id}       - Fetch one profile
//! PUT    /users/{id}       - Partially update a profile
//! DELETE /users/{id}       - Delete a profile
//! ```

pub mod auth;
pub mod docs;
pub mod users;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Router, middleware::from_fn, middleware::from_fn_with_state};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, cache_middleware, require_auth_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the profile routes router.
///
/// The list endpoint sits behind the shared response cache; everything else
/// always reaches the store. Token verification is a router-level layer so
/// it runs before the cache: a cached listing is never served to an
/// unauthenticated caller.
pub fn user_routes(state: &AppState) -> Router<AppState> {
    let list = get(users::list).layer(from_fn_with_state(state.clone(), cache_middleware));

    Router::new()
        .route("/", list.post(users::create))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::remove),
        )
        .layer(from_fn_with_state(
            state.clone(),
            require_auth_middleware,
        ))
}

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/openapi.json", get(docs::openapi))
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        .nest("/users", user_routes(&state).layer(api_rate_limiter()))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK. The in-memory backend
/// has nothing to probe and is always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.pool() {
        Some(pool) => match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::OK,
    }
}
