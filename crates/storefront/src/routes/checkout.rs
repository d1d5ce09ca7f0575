//! Checkout route handlers.
//!
//! Two-step flow: `POST /api/checkout` recomputes the cart total server-side
//! and opens a gateway order, then after the shopper pays in the hosted
//! widget, `POST /api/verify` checks the gateway signature and persists the
//! order atomically.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use larkspur_core::Money;

use crate::db::orders::NewOrder;
use crate::db::{CouponRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireShopper;
use crate::models::coupon::Coupon;
use crate::models::order::{CartItem, NewAddress};
use crate::state::AppState;

/// Upper bound on the quantity of a single line item.
const MAX_ITEM_QUANTITY: i32 = 99;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// The total the client computed, in shop currency (rupees).
    pub amount: Decimal,
    pub items: Vec<CartItem>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub order: OrderDetails,
}

#[derive(Debug, Deserialize)]
pub struct OrderDetails {
    pub address: NewAddress,
    pub items: Vec<CartItem>,
    pub coupon_code: Option<String>,
    pub total: Option<Decimal>,
}

/// `POST /api/checkout` - recompute the cart total and open a gateway order.
///
/// The client-supplied amount is advisory only; a mismatch against the
/// server-side recomputation rejects the request, so tampered carts never
/// reach the gateway.
pub async fn create_order(
    State(state): State<AppState>,
    RequireShopper(shopper): RequireShopper,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<Value>> {
    validate_items(&body.items)?;

    let coupon = resolve_coupon(&state, body.coupon_code.as_deref()).await?;
    let total = compute_cart_total(&state, &body.items, coupon.as_ref()).await?;

    if body.amount != total {
        return Err(AppError::Conflict(format!(
            "submitted total {} does not match computed total {total}",
            body.amount
        )));
    }

    let receipt = format!("shopper-{}", shopper.id);
    let gateway_order = state
        .payments()
        .create_order(Money::inr(total), &receipt)
        .await?;

    Ok(Json(json!({
        "id": gateway_order.id,
        "amount": gateway_order.amount,
        "currency": gateway_order.currency,
        "key_id": state.payments().key_id(),
    })))
}

/// `POST /api/verify` - verify the payment signature and persist the order.
///
/// An invalid signature yields `{"success": false}` with `400` and nothing is
/// written. On success the order, its address, and its items are committed in
/// one transaction with stock decremented.
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireShopper(shopper): RequireShopper,
    Json(body): Json<VerifyRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_items(&body.order.items)?;
    validate_address(&body.order.address)?;

    if state
        .payments()
        .verify_signature(
            &body.razorpay_order_id,
            &body.razorpay_payment_id,
            &body.razorpay_signature,
        )
        .is_err()
    {
        tracing::warn!(
            gateway_order_id = %body.razorpay_order_id,
            "payment signature verification failed"
        );
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Payment verification failed",
            })),
        ));
    }

    let coupon = resolve_coupon(&state, body.order.coupon_code.as_deref()).await?;

    let order = OrderRepository::new(state.pool())
        .create_paid_order(NewOrder {
            shopper_id: shopper.id,
            address: &body.order.address,
            items: &body.order.items,
            coupon: coupon.as_ref(),
            gateway_order_id: &body.razorpay_order_id,
            gateway_payment_id: &body.razorpay_payment_id,
            client_total: body.order.total,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::BadRequest("cart references an unknown product".to_owned())
            }
            other => other.into(),
        })?;

    tracing::info!(order_number = %order.order_number, "order placed");

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "orderId": order.order_number,
        })),
    ))
}

fn validate_items(items: &[CartItem]) -> Result<()> {
    if items.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }
    for item in items {
        if item.quantity < 1 || item.quantity > MAX_ITEM_QUANTITY {
            return Err(AppError::BadRequest(format!(
                "quantity for product {} must be between 1 and {MAX_ITEM_QUANTITY}",
                item.product_id
            )));
        }
    }
    Ok(())
}

fn validate_address(address: &NewAddress) -> Result<()> {
    let required = [
        ("recipient", &address.recipient),
        ("line1", &address.line1),
        ("city", &address.city),
        ("state", &address.state),
        ("postal_code", &address.postal_code),
        ("country", &address.country),
        ("phone", &address.phone),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!(
                "address field '{field}' must not be empty"
            )));
        }
    }
    Ok(())
}

async fn resolve_coupon(state: &AppState, code: Option<&str>) -> Result<Option<Coupon>> {
    let Some(code) = code else {
        return Ok(None);
    };

    let coupon = CouponRepository::new(state.pool())
        .get_by_code(code)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("unknown coupon code '{code}'")))?;

    if !coupon.is_active(chrono::Utc::now()) {
        return Err(AppError::BadRequest(format!(
            "coupon '{code}' has expired"
        )));
    }

    Ok(Some(coupon))
}

/// Recompute the cart total from catalog prices and an optional coupon.
async fn compute_cart_total(
    state: &AppState,
    items: &[CartItem],
    coupon: Option<&Coupon>,
) -> Result<Decimal> {
    let ids: Vec<_> = items.iter().map(|i| i.product_id).collect();
    let prices = ProductRepository::new(state.pool()).prices_for(&ids).await?;

    let mut subtotal = Decimal::ZERO;
    for item in items {
        let price = prices.get(&item.product_id).ok_or_else(|| {
            AppError::BadRequest(format!("unknown product {}", item.product_id))
        })?;
        subtotal += *price * Decimal::from(item.quantity);
    }

    let discount = coupon.map_or(Decimal::ZERO, |c| c.discount_on(subtotal));
    Ok((subtotal - discount).round_dp(2))
}
