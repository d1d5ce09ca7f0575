//! Review repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use larkspur_core::{ProductId, ReviewId, ShopperId};

use super::RepositoryError;
use crate::models::product::Review;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    product_id: i32,
    shopper_id: i32,
    shopper_email: String,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(r: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(r.id),
            product_id: ProductId::new(r.product_id),
            shopper_id: ShopperId::new(r.shopper_id),
            shopper_email: r.shopper_email,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.product_id, r.shopper_id, s.email AS shopper_email,
                    r.rating, r.comment, r.created_at
             FROM review r
             JOIN shopper s ON s.id = r.shopper_id
             WHERE r.product_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Create a review for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the rating is out of range.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        product_id: ProductId,
        shopper_id: ShopperId,
        rating: i32,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO review (product_id, shopper_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(product_id.as_i32())
        .bind(shopper_id.as_i32())
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::NotFound;
                }
                if db_err.is_check_violation() {
                    return RepositoryError::Conflict(
                        "rating must be between 1 and 5".to_owned(),
                    );
                }
            }
            RepositoryError::Database(e)
        })?;

        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.product_id, r.shopper_id, s.email AS shopper_email,
                    r.rating, r.comment, r.created_at
             FROM review r
             JOIN shopper s ON s.id = r.shopper_id
             WHERE r.id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(Review::from(row))
    }
}
