//! Shopper authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_shopper, set_current_shopper};
use crate::middleware::OptionalShopper;
use crate::models::user::CurrentShopper;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` - create a shopper account.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let shopper = AuthService::new(state.pool())
        .register_with_password(&body.email, &body.password)
        .await?;

    let current = CurrentShopper::from(&shopper);
    set_current_shopper(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&shopper.id, Some(shopper.email.as_str()));

    Ok((StatusCode::CREATED, Json(json!({ "shopper": current }))))
}

/// `POST /api/auth/login` - login with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>> {
    let shopper = AuthService::new(state.pool())
        .login_with_password(&body.email, &body.password)
        .await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let current = CurrentShopper::from(&shopper);
    set_current_shopper(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&shopper.id, Some(shopper.email.as_str()));

    Ok(Json(json!({ "shopper": current })))
}

/// `POST /api/auth/logout` - clear the shopper session.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_shopper(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Json(json!({ "success": true })))
}

/// `GET /api/auth/me` - the current shopper, or `shopper: null`.
pub async fn me(OptionalShopper(shopper): OptionalShopper) -> Json<Value> {
    Json(json!({ "shopper": shopper }))
}
