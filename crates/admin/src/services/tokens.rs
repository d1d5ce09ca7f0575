//! JWT token pair issuing and validation.
//!
//! Access tokens are short-lived and carry the role for authorization;
//! refresh tokens are longer-lived and carry only the subject. Both are
//! HS256-signed with the configured secret and delivered as HTTP-only
//! cookies.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use larkspur_core::{AdminUserId, Role};

/// Access token lifetime.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "admin_access_token";

/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "admin_refresh_token";

/// Token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token is missing, malformed, expired, or has a bad signature.
    #[error("invalid token")]
    Invalid,

    /// Token could not be created.
    #[error("token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Admin user ID.
    pub sub: i32,
    /// Login username, for display and audit context.
    pub username: String,
    /// Role at issue time.
    pub role: Role,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// The typed admin user ID.
    #[must_use]
    pub const fn admin_user_id(&self) -> AdminUserId {
        AdminUserId::new(self.sub)
    }
}

/// Claims carried by a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Admin user ID.
    pub sub: i32,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl RefreshClaims {
    /// The typed admin user ID.
    #[must_use]
    pub const fn admin_user_id(&self) -> AdminUserId {
        AdminUserId::new(self.sub)
    }
}

/// Signs and validates the admin token pair.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue an access token.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_access(
        &self,
        id: AdminUserId,
        username: &str,
        role: Role,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims {
            sub: id.as_i32(),
            username: username.to_owned(),
            role,
            exp: chrono::Utc::now().timestamp() + ACCESS_TOKEN_TTL_SECS,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Issue a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue_refresh(&self, id: AdminUserId) -> Result<String, TokenError> {
        let claims = RefreshClaims {
            sub: id.as_i32(),
            exp: chrono::Utc::now().timestamp() + REFRESH_TOKEN_TTL_SECS,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for any bad token.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    /// Validate a refresh token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for any bad token.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        decode::<RefreshClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("kq8Zr2Xw9Lp4Vn7Jd3Fh6Tb1Ym5Gc0Sx"))
    }

    #[test]
    fn access_token_round_trips() {
        let svc = service();
        let token = svc
            .issue_access(AdminUserId::new(7), "maya", Role::Admin)
            .expect("issue");
        let claims = svc.verify_access(&token).expect("verify");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "maya");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn refresh_token_round_trips() {
        let svc = service();
        let token = svc.issue_refresh(AdminUserId::new(7)).expect("issue");
        let claims = svc.verify_refresh(&token).expect("verify");
        assert_eq!(claims.admin_user_id(), AdminUserId::new(7));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let token = svc
            .issue_access(AdminUserId::new(7), "maya", Role::Admin)
            .expect("issue");
        let mut tampered = token;
        tampered.push('x');
        assert!(matches!(
            svc.verify_access(&tampered),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service()
            .issue_access(AdminUserId::new(7), "maya", Role::Admin)
            .expect("issue");
        let other = TokenService::new(&SecretString::from("z9Yx8Wv7Ut6Sr5Qp4On3Ml2Kj1Ih0Gf!"));
        assert!(other.verify_access(&token).is_err());
    }

    #[test]
    fn refresh_token_is_not_a_valid_access_token() {
        let svc = service();
        let refresh = svc.issue_refresh(AdminUserId::new(7)).expect("issue");
        // Access validation requires the username/role fields.
        assert!(svc.verify_access(&refresh).is_err());
    }
}
