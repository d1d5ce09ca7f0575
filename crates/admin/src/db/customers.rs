//! Shopper listing repository for the back office.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use larkspur_core::ShopperId;

use super::RepositoryError;
use crate::models::customer::CustomerSummary;

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    email: String,
    oauth_provider: Option<String>,
    order_count: i64,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for CustomerSummary {
    fn from(r: CustomerRow) -> Self {
        Self {
            id: ShopperId::new(r.id),
            email: r.email,
            oauth_provider: r.oauth_provider,
            order_count: r.order_count,
            created_at: r.created_at,
        }
    }
}

/// Repository for shopper summaries.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all shoppers with their order counts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CustomerSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT s.id, s.email, s.oauth_provider,
                    (SELECT count(*) FROM shop_order o WHERE o.shopper_id = s.id)
                        AS order_count,
                    s.created_at
             FROM shopper s
             ORDER BY s.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CustomerSummary::from).collect())
    }
}
