//! Product repository for catalog reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::product::Product;

/// Maximum page size the catalog will return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size when the client does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Filters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive name substring.
    pub search: Option<String>,
    /// Restrict to a category by slug.
    pub category_slug: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, capped at [`MAX_PAGE_SIZE`].
    pub limit: Option<u32>,
}

impl ProductFilter {
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
    category_slug: String,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
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
            category_slug: r.category_slug,
            created_at: r.created_at,
        }
    }
}

const SELECT_PRODUCT: &str = r"
    SELECT p.id, p.name, p.slug, p.description, p.care_instructions,
           p.size_chart, p.price, p.stock, p.image_urls, p.category_id,
           c.slug AS category_slug, p.created_at
    FROM product p
    JOIN category c ON c.id = p.category_id
";

/// Repository for product catalog reads.
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
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "{SELECT_PRODUCT}
             WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
               AND ($2::text IS NULL OR c.slug = $2)
             ORDER BY p.created_at DESC
             LIMIT $3 OFFSET $4"
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(filter.search.as_deref())
            .bind(filter.category_slug.as_deref())
            .bind(filter.limit())
            .bind(filter.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch current prices for a set of products.
    ///
    /// Missing IDs are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn prices_for(
        &self,
        ids: &[ProductId],
    ) -> Result<std::collections::HashMap<ProductId, Decimal>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            "SELECT id, price FROM product WHERE id = ANY($1)",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, price)| (ProductId::new(id), price))
            .collect())
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("{SELECT_PRODUCT} WHERE p.slug = $1");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Product::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        let default = ProductFilter::default();
        assert_eq!(default.limit(), DEFAULT_PAGE_SIZE);

        let huge = ProductFilter {
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(huge.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_is_zero_based_from_page_one() {
        let first = ProductFilter {
            page: Some(1),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(first.offset(), 0);

        let third = ProductFilter {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(third.offset(), 40);
    }

    #[test]
    fn page_zero_is_treated_as_page_one() {
        let filter = ProductFilter {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.offset(), 0);
    }
}
