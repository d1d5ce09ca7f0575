//! Product repository for catalog management.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{CategoryId, ProductId};

use super::{RepositoryError, map_unique_violation};
use crate::models::catalog::AdminProduct;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    care_instructions: String,
    size_chart: Option<String>,
    price: Decimal,
    stock: i32,
    image_urls: Vec<String>,
    category_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for AdminProduct {
    fn from(r: ProductRow) -> Self {
        Self {
            id: ProductId::new(r.id),
            name: r.name,
            slug: r.slug,
            description: r.description,
            care_instructions: r.care_instructions,
            size_chart: r.size_chart,
            price: r.price,
            stock: r.stock,
            image_urls: r.image_urls,
            category_id: CategoryId::new(r.category_id),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const SELECT_PRODUCT: &str = "SELECT id, name, slug, description, care_instructions, size_chart, \
     price, stock, image_urls, category_id, created_at, updated_at FROM product";

/// Maximum page size the admin listing will return.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Default page size when the client does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Filters for the admin product listing.
#[derive(Debug, Clone, Default)]
pub struct AdminProductFilter {
    /// Case-insensitive name substring.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, capped at [`MAX_PAGE_SIZE`].
    pub limit: Option<u32>,
}

impl AdminProductFilter {
    fn limit(&self) -> i64 {
        self.limit
            .map_or(DEFAULT_PAGE_SIZE, i64::from)
            .clamp(1, MAX_PAGE_SIZE)
    }

    fn offset(&self) -> i64 {
        let page = i64::from(self.page.unwrap_or(1).max(1));
        (page - 1) * self.limit()
    }
}

/// Fields for creating or replacing a product.
#[derive(Debug)]
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub care_instructions: &'a str,
    pub size_chart: Option<&'a str>,
    pub price: Decimal,
    pub stock: i32,
    pub image_urls: &'a [String],
    pub category_id: CategoryId,
}

/// Repository for product management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &AdminProductFilter,
    ) -> Result<Vec<AdminProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT}
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
               AND ($2::integer IS NULL OR category_id = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(filter.search.as_deref())
        .bind(filter.category_id.map(|c| c.as_i32()))
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AdminProduct::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<AdminProduct>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(AdminProduct::from))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn create(&self, input: ProductInput<'_>) -> Result<AdminProduct, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO product
                 (name, slug, description, care_instructions, size_chart, price,
                  stock, image_urls, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, name, slug, description, care_instructions, size_chart,
                       price, stock, image_urls, category_id, created_at, updated_at",
        )
        .bind(input.name)
        .bind(input.slug)
        .bind(input.description)
        .bind(input.care_instructions)
        .bind(input.size_chart)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.image_urls)
        .bind(input.category_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            map_unique_violation(e, "slug already exists")
        })?;

        Ok(AdminProduct::from(row))
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: ProductId,
        input: ProductInput<'_>,
    ) -> Result<AdminProduct, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE product
             SET name = $2, slug = $3, description = $4, care_instructions = $5,
                 size_chart = $6, price = $7, stock = $8, image_urls = $9,
                 category_id = $10, updated_at = now()
             WHERE id = $1
             RETURNING id, name, slug, description, care_instructions, size_chart,
                       price, stock, image_urls, category_id, created_at, updated_at",
        )
        .bind(id.as_i32())
        .bind(input.name)
        .bind(input.slug)
        .bind(input.description)
        .bind(input.care_instructions)
        .bind(input.size_chart)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.image_urls)
        .bind(input.category_id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(AdminProduct::from(row))
    }

    /// Set a product's stock level directly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the stock would go negative.
    pub async fn set_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<AdminProduct, RepositoryError> {
        if stock < 0 {
            return Err(RepositoryError::Conflict(
                "stock cannot be negative".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE product SET stock = $2, updated_at = now()
             WHERE id = $1
             RETURNING id, name, slug, description, care_instructions, size_chart,
                       price, stock, image_urls, category_id, created_at, updated_at",
        )
        .bind(id.as_i32())
        .bind(stock)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(AdminProduct::from(row))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        let default = AdminProductFilter::default();
        assert_eq!(default.limit(), DEFAULT_PAGE_SIZE);

        let huge = AdminProductFilter {
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(huge.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let third = AdminProductFilter {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(third.offset(), 50);

        let zero_page = AdminProductFilter {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(zero_page.offset(), 0);
    }
}
