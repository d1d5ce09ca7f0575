//! Review moderation handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use larkspur_core::ReviewId;

use crate::db::reviews::ReviewRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::catalog::AdminReview;
use crate::state::AppState;

/// `GET /api/admin/reviews`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminReview>>, AppError> {
    let reviews = ReviewRepository::new(state.pool()).list().await?;
    Ok(Json(reviews))
}

/// `DELETE /api/admin/reviews/{id}`
pub async fn destroy(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ReviewRepository::new(state.pool())
        .delete(ReviewId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
