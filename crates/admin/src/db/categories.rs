//! Category repository for catalog management.

use sqlx::PgPool;

use larkspur_core::CategoryId;

use super::{RepositoryError, map_unique_violation};
use crate::models::catalog::AdminCategory;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    product_count: i64,
}

impl From<CategoryRow> for AdminCategory {
    fn from(r: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(r.id),
            name: r.name,
            slug: r.slug,
            product_count: r.product_count,
        }
    }
}

const SELECT_CATEGORY: &str = "SELECT c.id, c.name, c.slug, \
     (SELECT count(*) FROM product p WHERE p.category_id = c.id) AS product_count \
     FROM category c";

/// Repository for category management.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories with product counts, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminCategory>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORY} ORDER BY c.name ASC"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(AdminCategory::from).collect())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, name: &str, slug: &str) -> Result<AdminCategory, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO category (name, slug) VALUES ($1, $2)
             RETURNING id, name, slug, 0::bigint AS product_count",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug already exists"))?;

        Ok(AdminCategory::from(row))
    }

    /// Rename a category or change its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: CategoryId,
        name: &str,
        slug: &str,
    ) -> Result<AdminCategory, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "UPDATE category SET name = $2, slug = $3 WHERE id = $1
             RETURNING id, name, slug,
                 (SELECT count(*) FROM product p WHERE p.category_id = category.id)
                     AS product_count",
        )
        .bind(id.as_i32())
        .bind(name)
        .bind(slug)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(AdminCategory::from(row))
    }

    /// Delete a category, refusing while products still reference it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` with the product count if the
    /// category is still in use. Returns `RepositoryError::NotFound` if the
    /// category does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let product_count = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM product WHERE category_id = $1",
        )
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await?;

        if product_count > 0 {
            return Err(RepositoryError::Conflict(format!(
                "category still has {product_count} product(s); move or delete them first"
            )));
        }

        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
