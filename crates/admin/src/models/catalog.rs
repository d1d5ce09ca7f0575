//! Catalog domain types as the back office sees them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larkspur_core::{CategoryId, ProductId, ReviewId, ShopperId};

/// A product with admin-only fields visible.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProduct {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub care_instructions: String,
    pub size_chart: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_urls: Vec<String>,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with its product count (drives the delete guard).
#[derive(Debug, Clone, Serialize)]
pub struct AdminCategory {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub product_count: i64,
}

/// A review as listed for moderation.
#[derive(Debug, Clone, Serialize)]
pub struct AdminReview {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub product_name: String,
    pub shopper_id: ShopperId,
    pub shopper_email: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
