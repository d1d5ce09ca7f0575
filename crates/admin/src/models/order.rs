//! Order domain types for the back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larkspur_core::{AddressId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, ShopperId};

/// An order as the back office sees it.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrder {
    pub id: OrderId,
    pub order_number: String,
    pub shopper_id: ShopperId,
    pub shopper_email: String,
    pub address_id: AddressId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub total: Decimal,
    pub items: Vec<AdminOrderItem>,
    pub created_at: DateTime<Utc>,
}

/// One line item on an order.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}
