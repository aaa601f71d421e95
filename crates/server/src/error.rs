//! Request-level error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`; the `IntoResponse` impl here
//! is the single place response bodies for failures are shaped.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AuthError;

/// An error surfaced to an HTTP client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload or query failed validation. Each entry is one
    /// client-facing message.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Authentication failure from the auth service.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The addressed record does not exist.
    #[error("user not found")]
    NotFound,

    /// Repository failure outside the auth flow.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// JSON `{"message": ...}` body.
fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// JSON `{"errors": [...]}` body for validation failures.
fn validation_errors(errors: &[String]) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
}

/// JSON 500 body carrying the error text.
fn internal(error: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal Server Error", "error": error })),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(errors) | Self::Auth(AuthError::Validation(errors)) => {
                validation_errors(errors)
            }
            Self::Auth(AuthError::UsernameTaken) => {
                message(StatusCode::BAD_REQUEST, "Username already exists")
            }
            Self::Auth(AuthError::UnknownUser) => {
                message(StatusCode::BAD_REQUEST, "Invalid credentials")
            }
            Self::Auth(AuthError::WrongPassword) => {
                message(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
            Self::NotFound | Self::Repository(RepositoryError::NotFound) => {
                message(StatusCode::NOT_FOUND, "User not found")
            }
            Self::Auth(
                err @ (AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_)),
            ) => {
                tracing::error!(error = %err, "auth service failure");
                sentry::capture_error(err);
                internal(&err.to_string())
            }
            Self::Repository(err) => {
                tracing::error!(error = %err, "repository failure");
                sentry::capture_error(err);
                internal(&err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_with_errors_array() {
        let response =
            AppError::Validation(vec!["Invalid Email".to_owned()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_user_and_wrong_password_split_status_codes() {
        assert_eq!(
            AppError::Auth(AuthError::UnknownUser).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth(AuthError::WrongPassword).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn missing_record_maps_to_404() {
        assert_eq!(
            AppError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
