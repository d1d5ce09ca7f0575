//! Wishlist domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larkspur_core::ProductId;

/// A product on a shopper's wishlist, with display fields.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistEntry {
    /// The wished-for product.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Product slug.
    pub slug: String,
    /// Current price.
    pub price: Decimal,
    /// First product image, if any.
    pub image_url: Option<String>,
    /// When the product was added to the wishlist.
    pub added_at: DateTime<Utc>,
}
