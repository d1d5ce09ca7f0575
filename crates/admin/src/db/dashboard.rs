//! Dashboard counters.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use super::RepositoryError;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub product_count: i64,
    pub order_count: i64,
    pub shopper_count: i64,
    pub review_count: i64,
    pub revenue: Decimal,
}

/// Repository for the dashboard's aggregate queries.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Gather the headline counters in one round trip.
    ///
    /// Revenue excludes cancelled orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, i64, i64, i64, Decimal)>(
            "SELECT
                 (SELECT count(*) FROM product),
                 (SELECT count(*) FROM shop_order),
                 (SELECT count(*) FROM shopper),
                 (SELECT count(*) FROM review),
                 (SELECT coalesce(sum(total), 0) FROM shop_order
                  WHERE status <> 'CANCELLED')",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats {
            product_count: row.0,
            order_count: row.1,
            shopper_count: row.2,
            review_count: row.3,
            revenue: row.4,
        })
    }
}
