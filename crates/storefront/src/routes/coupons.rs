//! Coupon route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::CouponRepository;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub code: String,
}

/// `GET /api/coupons/validate?code=...` - check a coupon code.
///
/// Unknown and expired codes both come back as `valid: false` so the UI can
/// show one message; the distinction is not the client's business.
pub async fn validate(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> Result<Json<Value>> {
    let coupon = CouponRepository::new(state.pool())
        .get_by_code(&query.code)
        .await?;

    let Some(coupon) = coupon else {
        return Ok(Json(json!({ "valid": false })));
    };

    if !coupon.is_active(chrono::Utc::now()) {
        return Ok(Json(json!({ "valid": false })));
    }

    Ok(Json(json!({
        "valid": true,
        "coupon": {
            "code": coupon.code,
            "discount_type": coupon.discount_type,
            "value": coupon.value,
        },
    })))
}
