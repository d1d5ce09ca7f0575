//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use larkspur_core::{AddressId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, ShopperId};

/// A line item in the client-held cart, submitted at checkout.
///
/// The cart is client-side-only state; the server sees it for the first time
/// in the verification request. Unit prices are never taken from the client -
/// they are snapshotted from the catalog inside the order transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// The product being purchased.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: i32,
}

/// A shipping address as submitted at checkout (not yet persisted).
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// A persisted shipping address snapshot.
///
/// Attached to exactly one order; never deduplicated against saved addresses.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-facing order number (e.g., `LS-003491827`).
    pub order_number: String,
    /// Owning shopper.
    pub shopper_id: ShopperId,
    /// Shipping address snapshot.
    pub address: Address,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Payment method label (e.g., `razorpay`).
    pub payment_method: String,
    /// Gateway-side order reference.
    pub gateway_order_id: String,
    /// Gateway-side payment reference.
    pub gateway_payment_id: String,
    /// Order total, recomputed server-side at verification time.
    pub total: Decimal,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A line item of a placed order with its price snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// The ordered product.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: i32,
    /// Unit price at the time the order was placed.
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_history_payload_carries_the_address_snapshot() {
        let order = Order {
            id: OrderId::new(7),
            order_number: "LS-000000007".to_string(),
            shopper_id: ShopperId::new(3),
            address: Address {
                id: AddressId::new(11),
                recipient: "Asha Rao".to_string(),
                line1: "14 Lotus Lane".to_string(),
                line2: None,
                city: "Pune".to_string(),
                state: "MH".to_string(),
                postal_code: "411001".to_string(),
                country: "IN".to_string(),
                phone: "9999999999".to_string(),
            },
            status: OrderStatus::Processing,
            payment_status: PaymentStatus::Paid,
            payment_method: "razorpay".to_string(),
            gateway_order_id: "order_x".to_string(),
            gateway_payment_id: "pay_x".to_string(),
            total: Decimal::new(49_900, 2),
            items: Vec::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&order).expect("order serializes");
        assert_eq!(json["address"]["recipient"], "Asha Rao");
        assert_eq!(json["address"]["city"], "Pune");
        assert_eq!(json["order_number"], "LS-000000007");
    }
}
