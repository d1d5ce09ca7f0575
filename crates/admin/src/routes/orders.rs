//! Order management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use larkspur_core::{OrderId, OrderStatus};

use crate::db::orders::{AdminOrderFilter, OrderRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::order::AdminOrder;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

/// `GET /api/admin/orders`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AdminOrder>>, AppError> {
    let status = query
        .status
        .map(|s| {
            s.parse::<OrderStatus>()
                .map_err(|_| AppError::BadRequest(format!("unknown order status: {s}")))
        })
        .transpose()?;

    let filter = AdminOrderFilter {
        status,
        page: query.page,
        limit: query.limit,
    };
    let orders = OrderRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(orders))
}

/// `GET /api/admin/orders/{id}`
pub async fn show(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AdminOrder>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    status: String,
}

/// `PUT /api/admin/orders/{id}/status`
///
/// Delivered and cancelled orders are frozen; moving them again is a 409.
pub async fn update_status(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<Json<AdminOrder>, AppError> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown order status: {}", body.status)))?;

    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await?;
    Ok(Json(order))
}
