//! Wishlist repository.
//!
//! Each shopper has at most one wishlist row; items hang off it with a
//! composite primary key, so membership toggles are a delete-then-insert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{ProductId, ShopperId, WishlistId};

use super::RepositoryError;
use crate::models::wishlist::WishlistEntry;

/// Result of toggling a product on a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The product was added to the wishlist.
    Added,
    /// The product was removed from the wishlist.
    Removed,
}

#[derive(sqlx::FromRow)]
struct WishlistEntryRow {
    product_id: i32,
    name: String,
    slug: String,
    price: Decimal,
    image_url: Option<String>,
    added_at: DateTime<Utc>,
}

impl From<WishlistEntryRow> for WishlistEntry {
    fn from(r: WishlistEntryRow) -> Self {
        Self {
            product_id: ProductId::new(r.product_id),
            name: r.name,
            slug: r.slug,
            price: r.price,
            image_url: r.image_url,
            added_at: r.added_at,
        }
    }
}

/// Repository for wishlist storage.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Toggle a product on the shopper's wishlist, creating the wishlist on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn toggle(
        &self,
        shopper_id: ShopperId,
        product_id: ProductId,
    ) -> Result<ToggleOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let wishlist_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO wishlist (shopper_id)
             VALUES ($1)
             ON CONFLICT (shopper_id) DO UPDATE SET shopper_id = EXCLUDED.shopper_id
             RETURNING id",
        )
        .bind(shopper_id.as_i32())
        .fetch_one(&mut *tx)
        .await?;
        let wishlist_id = WishlistId::new(wishlist_id);

        let removed = sqlx::query(
            "DELETE FROM wishlist_item WHERE wishlist_id = $1 AND product_id = $2",
        )
        .bind(wishlist_id.as_i32())
        .bind(product_id.as_i32())
        .execute(&mut *tx)
        .await?;

        if removed.rows_affected() > 0 {
            tx.commit().await?;
            return Ok(ToggleOutcome::Removed);
        }

        sqlx::query("INSERT INTO wishlist_item (wishlist_id, product_id) VALUES ($1, $2)")
            .bind(wishlist_id.as_i32())
            .bind(product_id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::NotFound;
                }
                RepositoryError::Database(e)
            })?;

        tx.commit().await?;
        Ok(ToggleOutcome::Added)
    }

    /// List the shopper's wishlist entries, most recently added first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, shopper_id: ShopperId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistEntryRow>(
            "SELECT p.id AS product_id, p.name, p.slug, p.price,
                    p.image_urls[1] AS image_url, wi.added_at
             FROM wishlist w
             JOIN wishlist_item wi ON wi.wishlist_id = w.id
             JOIN product p ON p.id = wi.product_id
             WHERE w.shopper_id = $1
             ORDER BY wi.added_at DESC",
        )
        .bind(shopper_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(WishlistEntry::from).collect())
    }
}
