//! Status enums for orders, payments, coupons, and the audit trail.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// `Delivered` and `Cancelled` are terminal; the admin API refuses
/// transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order may still change status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The database representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(Self::Processing),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Paid,
    Refunded,
}

impl PaymentStatus {
    /// The database representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// How a coupon discounts the order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the order total (value is 0-100).
    Percentage,
    /// Fixed amount off the order total.
    Fixed,
}

impl DiscountType {
    /// The database representation of this discount type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid discount type: {s}")),
        }
    }
}

/// Outcome of a back-office login attempt, as recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Credentials verified and tokens issued.
    Success,
    /// Wrong password, unknown identifier, or ineligible account.
    Failure,
    /// Attempt rejected because the account lockout is active.
    Locked,
}

impl AuditOutcome {
    /// The database representation of this outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Locked => "locked",
        }
    }
}

impl std::str::FromStr for AuditOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "locked" => Ok(Self::Locked),
            _ => Err(format!("invalid audit outcome: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips() {
        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.as_str().parse().expect("parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn delivered_and_cancelled_are_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn order_status_serializes_screaming() {
        let json = serde_json::to_string(&OrderStatus::Processing).expect("serialize");
        assert_eq!(json, "\"PROCESSING\"");
    }

    #[test]
    fn discount_type_round_trips() {
        for ty in [DiscountType::Percentage, DiscountType::Fixed] {
            let parsed: DiscountType = ty.as_str().parse().expect("parse");
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn audit_outcome_round_trips() {
        for outcome in [
            AuditOutcome::Success,
            AuditOutcome::Failure,
            AuditOutcome::Locked,
        ] {
            let parsed: AuditOutcome = outcome.as_str().parse().expect("parse");
            assert_eq!(parsed, outcome);
        }
    }
}
