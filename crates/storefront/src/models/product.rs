//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larkspur_core::{CategoryId, ProductId, ReviewId, ShopperId};

/// A product as shown on the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL slug, unique across the catalog.
    pub slug: String,
    /// Long-form description.
    pub description: String,
    /// Care instructions for the handcrafted piece.
    pub care_instructions: String,
    /// Optional size chart (free-form text).
    pub size_chart: Option<String>,
    /// Price in the shop currency.
    pub price: Decimal,
    /// Units currently in stock.
    pub stock: i32,
    /// Image URLs in display order.
    pub image_urls: Vec<String>,
    /// Owning category.
    pub category_id: CategoryId,
    /// Owning category's slug (denormalized for display).
    pub category_slug: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// A category grouping products.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// A shopper review of a product.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Unique review ID.
    pub id: ReviewId,
    /// The reviewed product.
    pub product_id: ProductId,
    /// The reviewing shopper.
    pub shopper_id: ShopperId,
    /// Reviewer's email (denormalized for display).
    pub shopper_email: String,
    /// Rating, 1 through 5.
    pub rating: i32,
    /// Free-form comment.
    pub comment: String,
    /// When the review was left.
    pub created_at: DateTime<Utc>,
}
