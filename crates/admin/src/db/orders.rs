//! Order repository for the back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use larkspur_core::{
    AddressId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, ShopperId,
};

use super::RepositoryError;
use crate::models::order::{AdminOrder, AdminOrderItem};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    shopper_id: i32,
    shopper_email: String,
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
    fn into_order(self, items: Vec<AdminOrderItem>) -> Result<AdminOrder, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status: PaymentStatus = self.payment_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(AdminOrder {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            shopper_id: ShopperId::new(self.shopper_id),
            shopper_email: self.shopper_email,
            address_id: AddressId::new(self.address_id),
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
struct ItemRow {
    id: i32,
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<ItemRow> for AdminOrderItem {
    fn from(r: ItemRow) -> Self {
        Self {
            id: OrderItemId::new(r.id),
            product_id: ProductId::new(r.product_id),
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
        }
    }
}

const SELECT_ORDER: &str = "SELECT o.id, o.order_number, o.shopper_id, s.email AS shopper_email, \
     o.address_id, o.status, o.payment_status, o.payment_method, o.gateway_order_id, \
     o.gateway_payment_id, o.total, o.created_at \
     FROM shop_order o JOIN shopper s ON s.id = o.shopper_id";

/// Filters for the admin order listing.
#[derive(Debug, Clone, Default)]
pub struct AdminOrderFilter {
    /// Restrict to one fulfillment status.
    pub status: Option<OrderStatus>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, capped at [`super::products::MAX_PAGE_SIZE`].
    pub limit: Option<u32>,
}

impl AdminOrderFilter {
    fn limit(&self) -> i64 {
        self.limit
            .map_or(super::products::DEFAULT_PAGE_SIZE, i64::from)
            .clamp(1, super::products::MAX_PAGE_SIZE)
    }

    fn offset(&self) -> i64 {
        let page = i64::from(self.page.unwrap_or(1).max(1));
        (page - 1) * self.limit()
    }
}

/// Repository for order management.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, without their items. Optionally
    /// restricted to one fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list(
        &self,
        filter: &AdminOrderFilter,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER}
             WHERE ($1::text IS NULL OR o.status = $1)
             ORDER BY o.created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_order(Vec::new())).collect()
    }

    /// Get a single order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<AdminOrder, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE o.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT oi.id, oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price
             FROM order_item oi
             JOIN product p ON p.id = oi.product_id
             WHERE oi.order_id = $1
             ORDER BY oi.id ASC",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        row.into_order(items.into_iter().map(AdminOrderItem::from).collect())
    }

    /// Move an order to a new fulfillment status.
    ///
    /// Terminal orders (delivered or cancelled) are frozen; attempts to move
    /// them out are rejected. The guard lives in the `UPDATE` itself, so two
    /// concurrent transitions cannot both slip past it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Conflict` if the current status is terminal.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<AdminOrder, RepositoryError> {
        let updated = sqlx::query(
            "UPDATE shop_order SET status = $2
             WHERE id = $1 AND status NOT IN ($3, $4)",
        )
        .bind(id.as_i32())
        .bind(status.as_str())
        .bind(OrderStatus::Delivered.as_str())
        .bind(OrderStatus::Cancelled.as_str())
        .execute(self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            let current = sqlx::query_scalar::<_, String>(
                "SELECT status FROM shop_order WHERE id = $1",
            )
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

            return Err(RepositoryError::Conflict(format!(
                "order is already {current} and cannot change status"
            )));
        }

        self.get(id).await
    }
}
