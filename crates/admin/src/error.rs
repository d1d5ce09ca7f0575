//! Application-level error type for the back office.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::tokens::TokenError;

/// Errors surfaced by admin route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage failure.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Authentication failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid access token.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// Request is malformed or violates a business rule.
    #[error("{0}")]
    BadRequest(String),

    /// Request conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => Self::Unauthorized("invalid token".to_owned()),
            TokenError::Encoding(err) => Self::Internal(err.to_string()),
        }
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_owned(),
            ),
            Self::Auth(auth) => match auth {
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned())
                }
                AuthError::Locked => (
                    StatusCode::FORBIDDEN,
                    "Account locked temporarily. Try again later.".to_owned(),
                ),
                AuthError::Disabled => {
                    (StatusCode::FORBIDDEN, "Account disabled".to_owned())
                }
                AuthError::InvalidToken | AuthError::Token(_) => {
                    (StatusCode::UNAUTHORIZED, "Invalid token".to_owned())
                }
                AuthError::Repository(_) | AuthError::PasswordHash => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                ),
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        }
    }

    fn capture(&self) {
        match self {
            Self::Database(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "admin request failed");
                sentry::capture_error(self);
            }
            Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash) => {
                tracing::error!(error = %self, "admin auth internals failed");
                sentry::capture_error(self);
            }
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.capture();
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_maps_to_403() {
        let (status, message) = AppError::Auth(AuthError::Locked).status_and_message();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(message.contains("locked"));
    }

    #[test]
    fn invalid_credentials_map_to_401_without_detail() {
        let (status, message) =
            AppError::Auth(AuthError::InvalidCredentials).status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid credentials");
    }

    #[test]
    fn repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn repository_conflict_maps_to_409() {
        let err: AppError = RepositoryError::Conflict("slug already exists".to_owned()).into();
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "slug already exists");
    }

    #[test]
    fn internal_errors_hide_details() {
        let (status, message) =
            AppError::Internal("secret detail".to_owned()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal server error");
    }
}
