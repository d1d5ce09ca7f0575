//! Dashboard handler.

use axum::Json;
use axum::extract::State;

use crate::db::dashboard::{DashboardRepository, DashboardStats};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `GET /api/admin/dashboard`
pub async fn stats(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = DashboardRepository::new(state.pool()).stats().await?;
    Ok(Json(stats))
}
