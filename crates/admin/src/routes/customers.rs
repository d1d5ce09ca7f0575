//! Shopper roster handler.

use axum::Json;
use axum::extract::State;

use crate::db::customers::CustomerRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::customer::CustomerSummary;
use crate::state::AppState;

/// `GET /api/admin/customers`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSummary>>, AppError> {
    let customers = CustomerRepository::new(state.pool()).list().await?;
    Ok(Json(customers))
}
