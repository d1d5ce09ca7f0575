//! Admin user repository, including the lockout bookkeeping.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use larkspur_core::{AdminUserId, Email, Role};

use super::{RepositoryError, map_unique_violation};
use crate::models::admin_user::AdminUser;

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    failed_login_attempts: i32,
    locked_until: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_admin_user(self) -> Result<AdminUser, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = self.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(AdminUser {
            id: AdminUserId::new(self.id),
            username: self.username,
            email,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active,
            failed_login_attempts: self.failed_login_attempts,
            locked_until: self.locked_until,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_ADMIN_USER: &str = "SELECT id, username, email, password_hash, role, is_active, \
     failed_login_attempts, locked_until, last_login_at, created_at, updated_at FROM admin_user";

/// Fields for creating or updating an admin account.
#[derive(Debug)]
pub struct NewAdminUser<'a> {
    pub username: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Repository for admin account storage.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an admin account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!("{SELECT_ADMIN_USER} WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(AdminUserRow::into_admin_user).transpose()
    }

    /// Get an admin account by username or email.
    ///
    /// Login accepts either identifier, so this matches both columns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "{SELECT_ADMIN_USER} WHERE username = $1 OR email = $1"
        ))
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminUserRow::into_admin_user).transpose()
    }

    /// List all admin accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, AdminUserRow>(&format!("{SELECT_ADMIN_USER} ORDER BY id ASC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter()
            .map(AdminUserRow::into_admin_user)
            .collect()
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken.
    pub async fn create(&self, new: NewAdminUser<'_>) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "INSERT INTO admin_user (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, password_hash, role, is_active,
                       failed_login_attempts, locked_until, last_login_at,
                       created_at, updated_at",
        )
        .bind(new.username)
        .bind(new.email.as_str())
        .bind(new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username or email already exists"))?;

        row.into_admin_user()
    }

    /// Update role and active flag of an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn update(
        &self,
        id: AdminUserId,
        role: Role,
        is_active: bool,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "UPDATE admin_user
             SET role = $2, is_active = $3, updated_at = now()
             WHERE id = $1
             RETURNING id, username, email, password_hash, role, is_active,
                       failed_login_attempts, locked_until, last_login_at,
                       created_at, updated_at",
        )
        .bind(id.as_i32())
        .bind(role.as_str())
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_admin_user()
    }

    /// Delete an admin account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn delete(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_user WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record a failed login attempt, returning the new attempt count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn increment_failed_attempts(
        &self,
        id: AdminUserId,
    ) -> Result<i32, RepositoryError> {
        let attempts = sqlx::query_scalar::<_, i32>(
            "UPDATE admin_user
             SET failed_login_attempts = failed_login_attempts + 1, updated_at = now()
             WHERE id = $1
             RETURNING failed_login_attempts",
        )
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(attempts)
    }

    /// Start a lockout window and reset the counter for the next window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn lock_account(
        &self,
        id: AdminUserId,
        until: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE admin_user
             SET failed_login_attempts = 0, locked_until = $2, updated_at = now()
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(until)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Reset lockout state and stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_successful_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE admin_user
             SET failed_login_attempts = 0, locked_until = NULL,
                 last_login_at = now(), updated_at = now()
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
