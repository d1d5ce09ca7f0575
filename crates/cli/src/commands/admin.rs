//! Admin account provisioning.
//!
//! # Usage
//!
//! ```bash
//! lk-cli admin create -u maya -e maya@example.com -r ADMIN
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::SecretString;
use thiserror::Error;

use larkspur_admin::db::admin_users::{AdminUserRepository, NewAdminUser};
use larkspur_core::{Email, Role};

const GENERATED_PASSWORD_LENGTH: usize = 20;
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during admin provisioning.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage-level failure (duplicate username, corrupt row).
    #[error("{0}")]
    Repository(#[from] larkspur_admin::db::RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: STAFF, ADMIN, SUPER_ADMIN")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,
}

/// Create a new admin account and print its credentials.
///
/// When `password` is `None`, a random one is generated and printed
/// once; it is stored only as a hash.
///
/// # Errors
///
/// Returns `AdminError` if validation or the insert fails.
pub async fn create_user(
    username: &str,
    email: &str,
    password: Option<&str>,
    role: &str,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let role: Role = role
        .to_lowercase()
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    if !role.is_admin_class() {
        return Err(AdminError::InvalidRole(role.to_string()));
    }

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let (password, generated) = match password {
        Some(p) => (p.to_owned(), false),
        None => (generate_password(), true),
    };
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let password_hash =
        larkspur_admin::services::auth::hash_password(&password).map_err(|_| AdminError::PasswordHash)?;

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = larkspur_admin::db::create_pool(&database_url).await?;

    tracing::info!("Creating admin account: {} ({})", username, role);
    let user = AdminUserRepository::new(&pool)
        .create(NewAdminUser {
            username,
            email: &email,
            password_hash: &password_hash,
            role,
        })
        .await?;

    tracing::info!(
        "Admin account created! ID: {}, Username: {}, Role: {}",
        user.id.as_i32(),
        user.username,
        user.role
    );
    if generated {
        #[allow(clippy::print_stdout)]
        {
            println!("Generated password (store it now, it is not saved): {password}");
        }
    }

    Ok(user.id.as_i32())
}

fn database_url() -> Result<SecretString, AdminError> {
    if let Ok(value) = std::env::var("ADMIN_DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))
}

fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_long_enough() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }
}
