//! Shopper repository for account storage.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use larkspur_core::{Email, ShopperId};

use super::RepositoryError;
use crate::models::user::Shopper;

#[derive(sqlx::FromRow)]
struct ShopperRow {
    id: i32,
    email: String,
    oauth_provider: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShopperRow {
    fn into_shopper(self) -> Result<Shopper, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Shopper {
            id: ShopperId::new(self.id),
            email,
            oauth_provider: self.oauth_provider,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_SHOPPER: &str =
    "SELECT id, email, oauth_provider, created_at, updated_at FROM shopper";

/// Repository for shopper database operations.
pub struct ShopperRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopperRepository<'a> {
    /// Create a new shopper repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a shopper by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: ShopperId) -> Result<Option<Shopper>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopperRow>(&format!("{SELECT_SHOPPER} WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(ShopperRow::into_shopper).transpose()
    }

    /// Create a new shopper with email and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<Shopper, RepositoryError> {
        let row = sqlx::query_as::<_, ShopperRow>(
            "INSERT INTO shopper (email, password_hash)
             VALUES ($1, $2)
             RETURNING id, email, oauth_provider, created_at, updated_at",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_shopper()
    }

    /// Get a shopper's password hash by email.
    ///
    /// Returns `None` if the shopper doesn't exist or has no password set
    /// (federated-login accounts).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Shopper, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct WithHash {
            id: i32,
            email: String,
            oauth_provider: Option<String>,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            password_hash: Option<String>,
        }

        let row = sqlx::query_as::<_, WithHash>(
            "SELECT id, email, oauth_provider, created_at, updated_at, password_hash
             FROM shopper WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let Some(password_hash) = r.password_hash else {
            return Ok(None);
        };

        let shopper = ShopperRow {
            id: r.id,
            email: r.email,
            oauth_provider: r.oauth_provider,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
        .into_shopper()?;

        Ok(Some((shopper, password_hash)))
    }

    /// Find or create a shopper for a federated identity.
    ///
    /// Matches on `(provider, subject)` first; falls back to attaching the
    /// provider identity to an existing account with the same email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_or_create_federated(
        &self,
        provider: &str,
        subject: &str,
        email: &Email,
    ) -> Result<Shopper, RepositoryError> {
        let existing = sqlx::query_as::<_, ShopperRow>(&format!(
            "{SELECT_SHOPPER} WHERE oauth_provider = $1 AND oauth_subject = $2"
        ))
        .bind(provider)
        .bind(subject)
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = existing {
            return row.into_shopper();
        }

        // Attach to an existing email account, or create a fresh one.
        let row = sqlx::query_as::<_, ShopperRow>(
            "INSERT INTO shopper (email, oauth_provider, oauth_subject)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE
                 SET oauth_provider = EXCLUDED.oauth_provider,
                     oauth_subject = EXCLUDED.oauth_subject,
                     updated_at = now()
             RETURNING id, email, oauth_provider, created_at, updated_at",
        )
        .bind(email.as_str())
        .bind(provider)
        .bind(subject)
        .fetch_one(self.pool)
        .await?;

        row.into_shopper()
    }
}
