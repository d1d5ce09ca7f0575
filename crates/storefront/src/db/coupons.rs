//! Coupon repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{CouponId, DiscountType};

use super::RepositoryError;
use crate::models::coupon::Coupon;

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: i32,
    code: String,
    discount_type: String,
    value: Decimal,
    expires_at: Option<DateTime<Utc>>,
}

impl CouponRow {
    fn into_coupon(self) -> Result<Coupon, RepositoryError> {
        let discount_type: DiscountType = self.discount_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid discount type in database: {e}"))
        })?;

        Ok(Coupon {
            id: CouponId::new(self.id),
            code: self.code,
            discount_type,
            value: self.value,
            expires_at: self.expires_at,
        })
    }
}

/// Repository for coupon lookups.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a coupon by its code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored discount type
    /// is invalid.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let row = sqlx::query_as::<_, CouponRow>(
            "SELECT id, code, discount_type, value, expires_at
             FROM coupon WHERE upper(code) = upper($1)",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        row.map(CouponRow::into_coupon).transpose()
    }
}
