//! Authentication service.
//!
//! Provides password login and federated-login account linking.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use larkspur_core::Email;

use crate::db::RepositoryError;
use crate::db::users::ShopperRepository;
use crate::models::user::Shopper;
use crate::services::oauth::FederatedIdentity;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles shopper registration, login, and federated identity linking.
pub struct AuthService<'a> {
    shoppers: ShopperRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            shoppers: ShopperRepository::new(pool),
        }
    }

    /// Register a new shopper with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Shopper, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let shopper = self
            .shoppers
            .create_with_password(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(shopper)
    }

    /// Login with email and password.
    ///
    /// Unknown emails, password-less federated accounts, and wrong passwords
    /// all collapse into the same `InvalidCredentials` error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Shopper, AuthError> {
        let email = Email::parse(email)?;

        let (shopper, password_hash) = self
            .shoppers
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(shopper)
    }

    /// Login (or register) with a verified federated identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn login_federated(
        &self,
        provider: &str,
        identity: &FederatedIdentity,
    ) -> Result<Shopper, AuthError> {
        let email = Email::parse(&identity.email)?;
        let shopper = self
            .shoppers
            .get_or_create_federated(provider, &identity.subject, &email)
            .await?;
        Ok(shopper)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        let err = validate_password("short").expect_err("should reject");
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn hash_then_verify_succeeds() {
        let hash = hash_password("correct horse battery").expect("hash");
        verify_password("correct horse battery", &hash).expect("verify");
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("correct horse battery").expect("hash");
        let err = verify_password("wrong password", &hash).expect_err("should fail");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
