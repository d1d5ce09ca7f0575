//! Federated login route handlers.
//!
//! Only mounted usefully when `OAUTH_CLIENT_ID` is configured; without it the
//! handlers answer 404 so the storefront works password-only.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::auth::set_current_shopper;
use crate::models::session_keys;
use crate::models::user::CurrentShopper;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Provider label stored on linked accounts.
const PROVIDER_NAME: &str = "google";

/// `GET /api/auth/oauth/login` - redirect the shopper to the provider.
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let Some(oauth) = state.oauth() else {
        return Err(AppError::NotFound("federated login not enabled".to_owned()));
    };

    let oauth_state = crate::services::oauth::OAuthClient::generate_state();
    session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let redirect_uri = callback_uri(&state);
    let url = oauth
        .authorization_url(&redirect_uri, &oauth_state)
        .map_err(|e| AppError::Internal(format!("oauth error: {e}")))?;

    Ok(Redirect::to(url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// `GET /api/auth/oauth/callback` - complete the flow and log the shopper in.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    let Some(oauth) = state.oauth() else {
        return Err(AppError::NotFound("federated login not enabled".to_owned()));
    };

    let expected_state: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    if expected_state.as_deref() != Some(query.state.as_str()) {
        return Err(AppError::BadRequest("login state mismatch".to_owned()));
    }

    let redirect_uri = callback_uri(&state);
    let identity = oauth
        .exchange_code(&query.code, &redirect_uri)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "federated login exchange failed");
            AppError::Unauthorized("federated login failed".to_owned())
        })?;

    let shopper = AuthService::new(state.pool())
        .login_federated(PROVIDER_NAME, &identity)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let current = CurrentShopper::from(&shopper);
    set_current_shopper(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&shopper.id, Some(shopper.email.as_str()));

    Ok(Redirect::to("/"))
}

fn callback_uri(state: &AppState) -> String {
    format!("{}/api/auth/oauth/callback", state.config().base_url)
}
