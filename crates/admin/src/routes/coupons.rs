//! Coupon management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use larkspur_core::{CouponId, DiscountType};

use crate::db::coupons::CouponRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::coupon::AdminCoupon;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CouponBody {
    code: String,
    discount_type: DiscountType,
    value: Decimal,
    expires_at: Option<DateTime<Utc>>,
}

impl CouponBody {
    /// Normalized coupon code, validated along with the discount value.
    fn validate(&self) -> Result<String, AppError> {
        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(AppError::BadRequest("code is required".to_owned()));
        }
        if self.value <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "discount value must be positive".to_owned(),
            ));
        }
        if self.discount_type == DiscountType::Percentage && self.value > Decimal::from(100) {
            return Err(AppError::BadRequest(
                "percentage discount cannot exceed 100".to_owned(),
            ));
        }
        Ok(code)
    }
}

/// `GET /api/admin/coupons`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminCoupon>>, AppError> {
    let coupons = CouponRepository::new(state.pool()).list().await?;
    Ok(Json(coupons))
}

/// `POST /api/admin/coupons`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CouponBody>,
) -> Result<(StatusCode, Json<AdminCoupon>), AppError> {
    let code = body.validate()?;
    let coupon = CouponRepository::new(state.pool())
        .create(&code, body.discount_type, body.value, body.expires_at)
        .await?;
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// `PUT /api/admin/coupons/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CouponBody>,
) -> Result<Json<AdminCoupon>, AppError> {
    let code = body.validate()?;
    let coupon = CouponRepository::new(state.pool())
        .update(
            CouponId::new(id),
            &code,
            body.discount_type,
            body.value,
            body.expires_at,
        )
        .await?;
    Ok(Json(coupon))
}

/// `DELETE /api/admin/coupons/{id}`
pub async fn destroy(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    CouponRepository::new(state.pool())
        .delete(CouponId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
