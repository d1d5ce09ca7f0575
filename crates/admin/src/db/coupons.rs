//! Coupon repository for the back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{CouponId, DiscountType};

use super::{RepositoryError, map_unique_violation};
use crate::models::coupon::AdminCoupon;

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: i32,
    code: String,
    discount_type: String,
    value: Decimal,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl CouponRow {
    fn into_coupon(self) -> Result<AdminCoupon, RepositoryError> {
        let discount_type: DiscountType = self.discount_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid discount type in database: {e}"))
        })?;

        Ok(AdminCoupon {
            id: CouponId::new(self.id),
            code: self.code,
            discount_type,
            value: self.value,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

const SELECT_COUPON: &str =
    "SELECT id, code, discount_type, value, expires_at, created_at FROM coupon";

/// Repository for coupon management.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all coupons, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminCoupon>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, CouponRow>(&format!("{SELECT_COUPON} ORDER BY created_at DESC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(CouponRow::into_coupon).collect()
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is taken or the value
    /// violates the check constraint.
    pub async fn create(
        &self,
        code: &str,
        discount_type: DiscountType,
        value: Decimal,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AdminCoupon, RepositoryError> {
        let row = sqlx::query_as::<_, CouponRow>(
            "INSERT INTO coupon (code, discount_type, value, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, code, discount_type, value, expires_at, created_at",
        )
        .bind(code)
        .bind(discount_type.as_str())
        .bind(value)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "coupon code already exists"))?;

        row.into_coupon()
    }

    /// Replace a coupon's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the coupon does not exist.
    /// Returns `RepositoryError::Conflict` if the new code is taken.
    pub async fn update(
        &self,
        id: CouponId,
        code: &str,
        discount_type: DiscountType,
        value: Decimal,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AdminCoupon, RepositoryError> {
        let row = sqlx::query_as::<_, CouponRow>(
            "UPDATE coupon
             SET code = $2, discount_type = $3, value = $4, expires_at = $5
             WHERE id = $1
             RETURNING id, code, discount_type, value, expires_at, created_at",
        )
        .bind(id.as_i32())
        .bind(code)
        .bind(discount_type.as_str())
        .bind(value)
        .bind(expires_at)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "coupon code already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        row.into_coupon()
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the coupon does not exist.
    pub async fn delete(&self, id: CouponId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM coupon WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
