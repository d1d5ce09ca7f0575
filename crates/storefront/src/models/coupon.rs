//! Coupon domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larkspur_core::{CouponId, DiscountType};

/// A discount coupon.
///
/// There is no stored "active" flag; a coupon is active exactly while
/// `expires_at` lies in the future, and forever when it has no expiry.
#[derive(Debug, Clone, Serialize)]
pub struct Coupon {
    /// Unique coupon ID.
    pub id: CouponId,
    /// Redemption code, unique.
    pub code: String,
    /// How the discount applies.
    pub discount_type: DiscountType,
    /// Percentage (0-100) or fixed amount, depending on `discount_type`.
    pub value: Decimal,
    /// Moment the coupon stops being redeemable; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Whether the coupon is redeemable at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|t| t > now)
    }

    /// The discount this coupon takes off `subtotal`.
    ///
    /// Never exceeds the subtotal, so a discounted total cannot go negative.
    #[must_use]
    pub fn discount_on(&self, subtotal: Decimal) -> Decimal {
        let discount = match self.discount_type {
            DiscountType::Percentage => subtotal * self.value / Decimal::from(100),
            DiscountType::Fixed => self.value,
        };
        discount.min(subtotal).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(discount_type: DiscountType, value: Decimal, expires_in: Duration) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: "WELCOME10".to_string(),
            discount_type,
            value,
            expires_at: Some(Utc::now() + expires_in),
        }
    }

    #[test]
    fn activity_is_derived_from_expiry() {
        let now = Utc::now();
        let active = coupon(DiscountType::Fixed, Decimal::from(50), Duration::hours(1));
        let expired = coupon(DiscountType::Fixed, Decimal::from(50), Duration::hours(-1));
        assert!(active.is_active(now));
        assert!(!expired.is_active(now));
    }

    #[test]
    fn coupon_without_expiry_never_expires() {
        let no_expiry = Coupon {
            expires_at: None,
            ..coupon(DiscountType::Fixed, Decimal::from(50), Duration::hours(1))
        };
        assert!(no_expiry.is_active(Utc::now()));
        assert!(no_expiry.is_active(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn percentage_discount() {
        let c = coupon(
            DiscountType::Percentage,
            Decimal::from(10),
            Duration::hours(1),
        );
        assert_eq!(c.discount_on(Decimal::from(500)), Decimal::from(50));
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let c = coupon(DiscountType::Fixed, Decimal::from(200), Duration::hours(1));
        assert_eq!(c.discount_on(Decimal::from(150)), Decimal::from(150));
        assert_eq!(c.discount_on(Decimal::from(500)), Decimal::from(200));
    }
}
