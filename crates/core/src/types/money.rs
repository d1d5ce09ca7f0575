//! Monetary amounts with currency, backed by decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
///
/// Amounts are stored in the currency's standard unit (e.g., rupees, not
/// paise) with decimal precision; the gateway boundary converts to minor
/// units via [`Money::to_minor_units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create an amount in the default currency.
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self::new(amount, Currency::INR)
    }

    /// Convert to the currency's minor unit (e.g., paise for INR).
    ///
    /// Returns `None` if the amount does not fit in an `i64` after scaling,
    /// or carries sub-minor-unit precision.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        let scaled = self.amount.checked_mul(Decimal::from(100))?;
        if scaled.fract() != Decimal::ZERO {
            return None;
        }
        scaled.to_i64()
    }
}

/// ISO 4217 currency codes accepted by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
}

impl Currency {
    /// The ISO 4217 code as a static string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_minor_units() {
        let price = Money::inr(Decimal::new(49999, 2)); // 499.99
        assert_eq!(price.to_minor_units(), Some(49999));
    }

    #[test]
    fn whole_amounts_scale_cleanly() {
        let price = Money::inr(Decimal::from(1200));
        assert_eq!(price.to_minor_units(), Some(120_000));
    }

    #[test]
    fn sub_paise_precision_is_rejected() {
        let price = Money::inr(Decimal::new(12345, 3)); // 12.345
        assert_eq!(price.to_minor_units(), None);
    }

    #[test]
    fn currency_codes() {
        assert_eq!(Currency::INR.code(), "INR");
        assert_eq!(Currency::default(), Currency::INR);
    }
}
