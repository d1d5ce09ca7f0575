//! Review moderation repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use larkspur_core::{ProductId, ReviewId, ShopperId};

use super::RepositoryError;
use crate::models::catalog::AdminReview;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    product_id: i32,
    product_name: String,
    shopper_id: i32,
    shopper_email: String,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for AdminReview {
    fn from(r: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(r.id),
            product_id: ProductId::new(r.product_id),
            product_name: r.product_name,
            shopper_id: ShopperId::new(r.shopper_id),
            shopper_email: r.shopper_email,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

/// Repository for review moderation.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.product_id, p.name AS product_name, r.shopper_id,
                    s.email AS shopper_email, r.rating, r.comment, r.created_at
             FROM review r
             JOIN product p ON p.id = r.product_id
             JOIN shopper s ON s.id = r.shopper_id
             ORDER BY r.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AdminReview::from).collect())
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM review WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
