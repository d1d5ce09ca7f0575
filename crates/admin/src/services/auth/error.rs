//! Back-office authentication errors.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::tokens::TokenError;

/// Errors from back-office login and token refresh.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong credentials, unknown account, disabled account, or an account
    /// without back-office access. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is inside a lockout window.
    #[error("account locked temporarily")]
    Locked,

    /// Account exists but has been deactivated.
    #[error("account disabled")]
    Disabled,

    /// Refresh token is missing, expired, or forged.
    #[error("invalid token")]
    InvalidToken,

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Signing or verifying a token failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Password hashing internals failed.
    #[error("password hash error")]
    PasswordHash,
}
