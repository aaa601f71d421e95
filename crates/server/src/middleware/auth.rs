//! Bearer token authentication extractor.
//!
//! Handlers that need a caller identity take [`RequireAuth`] as an argument;
//! the extractor verifies the `Authorization: Bearer <token>` header against
//! the process token secret and rejects the request itself otherwise, so
//! handlers never see unauthenticated traffic.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::{TokenError, TokenIdentity};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(identity): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
pub struct RequireAuth(pub TokenIdentity);

/// Rejection returned when the bearer token is absent or does not verify.
#[derive(Debug)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header on the request.
    MissingToken,
    /// A token was presented but failed verification.
    InvalidToken(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized: Missing token" })),
            )
                .into_response(),
            Self::InvalidToken(reason) => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Forbidden: Invalid token", "error": reason })),
            )
                .into_response(),
        }
    }
}

/// Router-level authentication middleware.
///
/// Applied to the whole profile router so verification happens before any
/// inner layer, the response cache included; a cache hit must never be
/// served to an unauthenticated caller. The verified identity is stored in
/// request extensions for handlers that want it.
pub async fn require_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let (mut parts, body) = request.into_parts();
    let RequireAuth(identity) = RequireAuth::from_request_parts(&mut parts, &state).await?;

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AuthRejection::MissingToken)?;

        let identity = state.tokens().verify(token).map_err(|e| {
            let reason = match &e {
                TokenError::Expired => "jwt expired".to_owned(),
                other => other.to_string(),
            };
            AuthRejection::InvalidToken(reason)
        })?;

        Ok(Self(identity))
    }
}
