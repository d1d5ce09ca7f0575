//! Order repository.
//!
//! Order creation is the one multi-step write in the storefront: address,
//! order, items, and stock decrements all commit or roll back together.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{
    AddressId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, ShopperId,
};

use super::RepositoryError;
use crate::models::coupon::Coupon;
use crate::models::order::{Address, CartItem, NewAddress, Order, OrderItem};

/// Everything needed to persist a verified, paid order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    /// The purchasing shopper.
    pub shopper_id: ShopperId,
    /// Shipping address snapshot from the checkout form.
    pub address: &'a NewAddress,
    /// Cart line items; unit prices come from the catalog, not the client.
    pub items: &'a [CartItem],
    /// Coupon to apply, already validated as active.
    pub coupon: Option<&'a Coupon>,
    /// Gateway order reference.
    pub gateway_order_id: &'a str,
    /// Gateway payment reference.
    pub gateway_payment_id: &'a str,
    /// The total the client believes it paid; a disagreement with the
    /// server-side recomputation aborts the transaction.
    pub client_total: Option<Decimal>,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    shopper_id: i32,
    address_id: i32,
    status: String,
    payment_status: String,
    payment_method: String,
    gateway_order_id: String,
    gateway_payment_id: String,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, address: Address, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status: PaymentStatus = self.payment_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            shopper_id: ShopperId::new(self.shopper_id),
            address,
            status,
            payment_status,
            payment_method: self.payment_method,
            gateway_order_id: self.gateway_order_id,
            gateway_payment_id: self.gateway_payment_id,
            total: self.total,
            items,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    recipient: String,
    line1: String,
    line2: Option<String>,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    phone: String,
}

impl From<AddressRow> for Address {
    fn from(r: AddressRow) -> Self {
        Self {
            id: AddressId::new(r.id),
            recipient: r.recipient,
            line1: r.line1,
            line2: r.line2,
            city: r.city,
            state: r.state,
            postal_code: r.postal_code,
            country: r.country,
            phone: r.phone,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(r.id),
            product_id: ProductId::new(r.product_id),
            quantity: r.quantity,
            unit_price: r.unit_price,
        }
    }
}

/// Repository for order persistence and history.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a paid order atomically.
    ///
    /// Inside one transaction: inserts the address snapshot, decrements stock
    /// for every line item (guarded by `stock >= quantity`, so concurrent
    /// checkouts cannot oversell), snapshots unit prices from the catalog,
    /// recomputes the total, and inserts the order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a cart product does not exist.
    /// Returns `RepositoryError::Conflict` if stock is insufficient or the
    /// client-submitted total disagrees with the recomputed one.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_paid_order(&self, new: NewOrder<'_>) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let address_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO address (recipient, line1, line2, city, state, postal_code, country, phone)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&new.address.recipient)
        .bind(&new.address.line1)
        .bind(new.address.line2.as_deref())
        .bind(&new.address.city)
        .bind(&new.address.state)
        .bind(&new.address.postal_code)
        .bind(&new.address.country)
        .bind(&new.address.phone)
        .fetch_one(&mut *tx)
        .await?;

        // Decrement stock and snapshot unit prices. A missing row means the
        // product doesn't exist or has too little stock left.
        let mut subtotal = Decimal::ZERO;
        let mut priced_items: Vec<(ProductId, i32, Decimal)> = Vec::with_capacity(new.items.len());
        for item in new.items {
            let unit_price = sqlx::query_scalar::<_, Decimal>(
                "UPDATE product SET stock = stock - $1, updated_at = now()
                 WHERE id = $2 AND stock >= $1
                 RETURNING price",
            )
            .bind(item.quantity)
            .bind(item.product_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?;

            let Some(unit_price) = unit_price else {
                let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM product WHERE id = $1")
                    .bind(item.product_id.as_i32())
                    .fetch_optional(&mut *tx)
                    .await?;
                return Err(match exists {
                    Some(_) => RepositoryError::Conflict(format!(
                        "insufficient stock for product {}",
                        item.product_id
                    )),
                    None => RepositoryError::NotFound,
                });
            };

            subtotal += unit_price * Decimal::from(item.quantity);
            priced_items.push((item.product_id, item.quantity, unit_price));
        }

        let discount = new
            .coupon
            .map_or(Decimal::ZERO, |c| c.discount_on(subtotal));
        let total = (subtotal - discount).round_dp(2);

        if let Some(client_total) = new.client_total
            && client_total != total
        {
            return Err(RepositoryError::Conflict(format!(
                "submitted total {client_total} does not match computed total {total}"
            )));
        }

        let order_number = generate_order_number();

        let order_row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO shop_order
                 (order_number, shopper_id, address_id, status, payment_status,
                  payment_method, gateway_order_id, gateway_payment_id, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, order_number, shopper_id, address_id, status, payment_status,
                       payment_method, gateway_order_id, gateway_payment_id, total, created_at",
        )
        .bind(&order_number)
        .bind(new.shopper_id.as_i32())
        .bind(address_id)
        .bind(OrderStatus::Processing.as_str())
        .bind(PaymentStatus::Paid.as_str())
        .bind("razorpay")
        .bind(new.gateway_order_id)
        .bind(new.gateway_payment_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(priced_items.len());
        for (product_id, quantity, unit_price) in priced_items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                "INSERT INTO order_item (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, order_id, product_id, quantity, unit_price",
            )
            .bind(order_row.id)
            .bind(product_id.as_i32())
            .bind(quantity)
            .bind(unit_price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(OrderItem::from(item_row));
        }

        tx.commit().await?;

        let address = Address {
            id: AddressId::new(address_id),
            recipient: new.address.recipient.clone(),
            line1: new.address.line1.clone(),
            line2: new.address.line2.clone(),
            city: new.address.city.clone(),
            state: new.address.state.clone(),
            postal_code: new.address.postal_code.clone(),
            country: new.address.country.clone(),
            phone: new.address.phone.clone(),
        };
        order_row.into_order(address, items)
    }

    /// List a shopper's orders, newest first, with their items and the
    /// shipping address snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is
    /// invalid or an order's address row is missing.
    pub async fn list_for_shopper(
        &self,
        shopper_id: ShopperId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, order_number, shopper_id, address_id, status, payment_status,
                    payment_method, gateway_order_id, gateway_payment_id, total, created_at
             FROM shop_order
             WHERE shopper_id = $1
             ORDER BY created_at DESC",
        )
        .bind(shopper_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in order_rows {
            let address_row = sqlx::query_as::<_, AddressRow>(
                "SELECT id, recipient, line1, line2, city, state, postal_code, country, phone
                 FROM address WHERE id = $1",
            )
            .bind(row.address_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order {} references missing address {}",
                    row.id, row.address_id
                ))
            })?;

            let item_rows = sqlx::query_as::<_, OrderItemRow>(
                "SELECT id, order_id, product_id, quantity, unit_price
                 FROM order_item WHERE order_id = $1 ORDER BY id ASC",
            )
            .bind(row.id)
            .fetch_all(self.pool)
            .await?;

            let items = item_rows.into_iter().map(OrderItem::from).collect();
            orders.push(row.into_order(Address::from(address_row), items)?);
        }

        Ok(orders)
    }
}

/// Generate a human-facing order number (`LS-` + 9 digits).
fn generate_order_number() -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("LS-{suffix:09}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_have_fixed_shape() {
        for _ in 0..32 {
            let n = generate_order_number();
            assert_eq!(n.len(), 12);
            assert!(n.starts_with("LS-"));
            assert!(n[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
