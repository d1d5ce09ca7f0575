//! Access-token extractors for admin route handlers.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use larkspur_core::Role;

use crate::error::AppError;
use crate::services::auth::RequestContext;
use crate::services::tokens::ACCESS_COOKIE;
use crate::state::AppState;

/// Extractor that requires a valid access token with a back-office role.
///
/// The token travels in the `admin_access_token` HTTP-only cookie; the
/// claims inside it are trusted until expiry, so role changes take
/// effect at the next refresh.
pub struct RequireAdmin(pub crate::services::tokens::AccessClaims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or_else(|| AppError::Unauthorized("Login required".to_owned()))?;

        let claims = state
            .tokens()
            .verify_access(&token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_owned()))?;

        if !claims.role.is_admin_class() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        Ok(Self(claims))
    }
}

/// Extractor that additionally requires the `SUPER_ADMIN` role.
///
/// Only account management routes use this.
pub struct RequireSuperAdmin(pub crate::services::tokens::AccessClaims);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdmin(claims) = RequireAdmin::from_request_parts(parts, state).await?;
        if claims.role != Role::SuperAdmin {
            return Err(AppError::Forbidden(
                "Super admin access required".to_owned(),
            ));
        }
        Ok(Self(claims))
    }
}

/// Pull the client IP and user agent out of request headers for audit
/// entries.
#[must_use]
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_owned())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_owned())
        });

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    RequestContext {
        ip_address,
        user_agent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn context_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        headers.insert(
            axum::http::header::USER_AGENT,
            HeaderValue::from_static("curl/8.0"),
        );

        let ctx = request_context(&headers);
        assert_eq!(ctx.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn context_is_empty_without_headers() {
        let ctx = request_context(&HeaderMap::new());
        assert!(ctx.ip_address.is_none());
        assert!(ctx.user_agent.is_none());
    }
}
