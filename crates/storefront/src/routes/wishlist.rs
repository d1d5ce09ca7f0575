//! Wishlist route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use larkspur_core::ProductId;

use crate::db::WishlistRepository;
use crate::db::wishlist::ToggleOutcome;
use crate::error::Result;
use crate::middleware::RequireShopper;
use crate::state::AppState;

/// `GET /api/wishlist` - list the shopper's wishlist.
pub async fn index(
    State(state): State<AppState>,
    RequireShopper(shopper): RequireShopper,
) -> Result<Json<Value>> {
    let entries = WishlistRepository::new(state.pool())
        .list(shopper.id)
        .await?;

    Ok(Json(json!({ "wishlist": entries })))
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub product_id: ProductId,
}

/// `POST /api/wishlist` - toggle a product on the shopper's wishlist.
pub async fn toggle(
    State(state): State<AppState>,
    RequireShopper(shopper): RequireShopper,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<Value>> {
    let outcome = WishlistRepository::new(state.pool())
        .toggle(shopper.id, body.product_id)
        .await?;

    Ok(Json(json!({
        "added": outcome == ToggleOutcome::Added,
    })))
}
