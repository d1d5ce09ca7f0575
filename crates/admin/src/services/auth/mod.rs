//! Back-office login with lockout and audit logging.
//!
//! Every login attempt is written to the audit trail, whatever its
//! outcome. Three consecutive failures lock the account for thirty
//! minutes; the counter resets when the lock is applied so the next
//! window starts fresh, and resets again on any successful login.

mod error;

pub use error::AuthError;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use sqlx::PgPool;

use larkspur_core::AuditOutcome;

use crate::db::admin_users::AdminUserRepository;
use crate::db::audit_log::AuditLogRepository;
use crate::models::admin_user::AdminUser;
use crate::services::tokens::TokenService;

/// Consecutive failures that trigger a lockout.
pub const MAX_FAILED_ATTEMPTS: i32 = 3;

/// Length of a lockout window.
pub const LOCKOUT_MINUTES: i64 = 30;

/// Request-scoped context recorded with every audit entry.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Tokens handed out after a successful login or refresh.
#[derive(Debug)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Back-office authentication service.
pub struct AuthService<'a> {
    admins: AdminUserRepository<'a>,
    audit: AuditLogRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create an auth service over the given pool and token signer.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
            audit: AuditLogRepository::new(pool),
            tokens,
        }
    }

    /// Authenticate an admin by username or email.
    ///
    /// Unknown accounts, customer-role accounts, and wrong passwords all
    /// fail with `InvalidCredentials` so the response leaks nothing about
    /// which identifiers exist. Locked and disabled accounts get their own
    /// errors; the audit trail records the real outcome either way.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Locked` inside a lockout window,
    /// `AuthError::Disabled` for a deactivated account,
    /// `AuthError::InvalidCredentials` for any other rejection, and
    /// `AuthError::Repository` on storage failure.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        ctx: &RequestContext,
    ) -> Result<(AdminUser, TokenPair), AuthError> {
        let Some(user) = self.admins.get_by_identifier(identifier).await? else {
            self.record(identifier, AuditOutcome::Failure, ctx).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if user.is_locked(Utc::now()) {
            self.record(&user.username, AuditOutcome::Locked, ctx)
                .await?;
            return Err(AuthError::Locked);
        }

        if !user.is_active {
            self.record(&user.username, AuditOutcome::Failure, ctx)
                .await?;
            return Err(AuthError::Disabled);
        }

        if !user.role.is_admin_class() {
            self.record(&user.username, AuditOutcome::Failure, ctx)
                .await?;
            return Err(AuthError::InvalidCredentials);
        }

        if !verify_password(password, &user.password_hash) {
            let attempts = self.admins.increment_failed_attempts(user.id).await?;
            if attempts >= MAX_FAILED_ATTEMPTS {
                let until = Utc::now() + Duration::minutes(LOCKOUT_MINUTES);
                self.admins.lock_account(user.id, until).await?;
                tracing::warn!(
                    username = %user.username,
                    "admin account locked after repeated failed logins"
                );
            }
            self.record(&user.username, AuditOutcome::Failure, ctx)
                .await?;
            return Err(AuthError::InvalidCredentials);
        }

        self.admins.record_successful_login(user.id).await?;
        self.record(&user.username, AuditOutcome::Success, ctx)
            .await?;

        let pair = self.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// Re-reads the account so a deactivation or demotion since issue
    /// takes effect immediately.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token or the account it
    /// names is no longer acceptable.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(AdminUser, TokenPair), AuthError> {
        let claims = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .admins
            .get_by_id(claims.admin_user_id())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.is_back_office() || user.is_locked(Utc::now()) {
            return Err(AuthError::InvalidToken);
        }

        let pair = self.issue_pair(&user)?;
        Ok((user, pair))
    }

    fn issue_pair(&self, user: &AdminUser) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self
                .tokens
                .issue_access(user.id, &user.username, user.role)?,
            refresh: self.tokens.issue_refresh(user.id)?,
        })
    }

    async fn record(
        &self,
        username: &str,
        outcome: AuditOutcome,
        ctx: &RequestContext,
    ) -> Result<(), AuthError> {
        self.audit
            .record(
                username,
                outcome,
                ctx.ip_address.as_deref(),
                ctx.user_agent.as_deref(),
            )
            .await?;
        Ok(())
    }
}

/// Hash a password with Argon2id and a fresh salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored Argon2 hash.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
