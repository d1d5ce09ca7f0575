//! Account route handlers.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireShopper;
use crate::state::AppState;

/// `GET /api/account/orders` - the shopper's order history, newest first.
pub async fn orders(
    State(state): State<AppState>,
    RequireShopper(shopper): RequireShopper,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_shopper(shopper.id)
        .await?;

    Ok(Json(json!({ "orders": orders })))
}
