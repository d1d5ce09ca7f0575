//! Coupon domain types for the back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larkspur_core::{CouponId, DiscountType};

/// A coupon as managed by the back office.
#[derive(Debug, Clone, Serialize)]
pub struct AdminCoupon {
    pub id: CouponId,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
