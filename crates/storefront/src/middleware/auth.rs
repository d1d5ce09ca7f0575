//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in shopper in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentShopper, session_keys};

/// Extractor that requires a logged-in shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireShopper(shopper): RequireShopper,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", shopper.email)
/// }
/// ```
pub struct RequireShopper(pub CurrentShopper);

/// Rejection returned when a shopper session is required but absent.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Login required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireShopper
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let shopper: CurrentShopper = session
            .get(session_keys::CURRENT_SHOPPER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(shopper))
    }
}

/// Extractor that optionally gets the current shopper.
///
/// Unlike `RequireShopper`, this does not reject the request if the shopper
/// is not logged in.
pub struct OptionalShopper(pub Option<CurrentShopper>);

impl<S> FromRequestParts<S> for OptionalShopper
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let shopper = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentShopper>(session_keys::CURRENT_SHOPPER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(shopper))
    }
}

/// Helper to set the current shopper in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_shopper(
    session: &Session,
    shopper: &CurrentShopper,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_SHOPPER, shopper).await
}

/// Helper to clear the current shopper from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_shopper(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentShopper>(session_keys::CURRENT_SHOPPER)
        .await?;
    Ok(())
}
