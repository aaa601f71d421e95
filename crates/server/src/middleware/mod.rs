//! Request middleware: authentication, response caching, rate limiting,
//! and security headers.

pub mod auth;
pub mod cache;
pub mod rate_limit;
pub mod security_headers;

pub use auth::{AuthRejection, RequireAuth, require_auth_middleware};
pub use cache::{ResponseCache, cache_middleware};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use security_headers::security_headers_middleware;
