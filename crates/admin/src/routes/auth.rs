//! Login, refresh, and logout.
//!
//! Tokens are delivered as HTTP-only cookies so the admin SPA never
//! touches them from script.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};
use time::Duration;

use crate::error::AppError;
use crate::middleware::auth::request_context;
use crate::services::auth::{AuthService, TokenPair};
use crate::services::tokens::{
    ACCESS_COOKIE, ACCESS_TOKEN_TTL_SECS, REFRESH_COOKIE, REFRESH_TOKEN_TTL_SECS,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    identifier: String,
    password: String,
}

/// `POST /api/admin/login`
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let identifier = body.identifier.trim();
    if identifier.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "identifier and password are required".to_owned(),
        ));
    }

    let ctx = request_context(&headers);
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, pair) = auth.login(identifier, &body.password, &ctx).await?;

    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.as_i32().to_string()),
            username: Some(user.username.clone()),
            ..Default::default()
        }));
    });

    let jar = set_token_cookies(jar, &pair, state.config().is_secure());
    Ok((
        jar,
        Json(json!({
            "message": "Login successful",
            "user": { "username": user.username, "role": user.role },
        })),
    ))
}

/// `POST /api/admin/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or_else(|| AppError::Unauthorized("Refresh token missing".to_owned()))?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, pair) = auth.refresh(&token).await?;

    let jar = set_token_cookies(jar, &pair, state.config().is_secure());
    Ok((
        jar,
        Json(json!({
            "message": "Token refreshed",
            "user": { "username": user.username, "role": user.role },
        })),
    ))
}

/// `POST /api/admin/logout`
///
/// Stateless on the server: expires both cookies. Tokens already issued
/// stay valid until their own expiry.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let secure = state.config().is_secure();
    let jar = jar
        .add(expired_cookie(ACCESS_COOKIE, secure))
        .add(expired_cookie(REFRESH_COOKIE, secure));
    (jar, Json(json!({ "message": "Logged out" })))
}

fn set_token_cookies(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    jar.add(token_cookie(
        ACCESS_COOKIE,
        pair.access.clone(),
        ACCESS_TOKEN_TTL_SECS,
        secure,
    ))
    .add(token_cookie(
        REFRESH_COOKIE,
        pair.refresh.clone(),
        REFRESH_TOKEN_TTL_SECS,
        secure,
    ))
}

fn token_cookie(name: &'static str, value: String, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(Duration::seconds(ttl_secs))
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookies_are_http_only_and_strict() {
        let cookie = token_cookie(ACCESS_COOKIE, "abc".to_owned(), ACCESS_TOKEN_TTL_SECS, true);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::minutes(15)));
    }

    #[test]
    fn refresh_cookie_lives_seven_days() {
        let cookie = token_cookie(
            REFRESH_COOKIE,
            "abc".to_owned(),
            REFRESH_TOKEN_TTL_SECS,
            false,
        );
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn expired_cookie_clears_immediately() {
        let cookie = expired_cookie(ACCESS_COOKIE, false);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.value(), "");
    }
}
