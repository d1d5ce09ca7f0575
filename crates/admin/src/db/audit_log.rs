//! Audit trail repository.
//!
//! The audit log is append-only; nothing in the application updates or
//! deletes rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use larkspur_core::{AuditLogId, AuditOutcome};

use super::RepositoryError;
use crate::models::audit::AuditEntry;

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i32,
    username: String,
    outcome: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> Result<AuditEntry, RepositoryError> {
        let outcome: AuditOutcome = self.outcome.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid audit outcome in database: {e}"))
        })?;

        Ok(AuditEntry {
            id: AuditLogId::new(self.id),
            username: self.username,
            outcome,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: self.created_at,
        })
    }
}

/// Repository for the login audit trail.
pub struct AuditLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AuditLogRepository<'a> {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a login attempt to the trail.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        username: &str,
        outcome: AuditOutcome,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO audit_log (username, outcome, ip_address, user_agent)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(username)
        .bind(outcome.as_str())
        .bind(ip_address)
        .bind(user_agent)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// The most recent attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuditRow>(
            "SELECT id, username, outcome, ip_address, user_agent, created_at
             FROM audit_log ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit.clamp(1, 500))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AuditRow::into_entry).collect()
    }
}
