//! Category management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use larkspur_core::CategoryId;

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::catalog::AdminCategory;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    name: String,
    slug: String,
}

impl CategoryBody {
    fn validate(&self) -> Result<(&str, &str), AppError> {
        let name = self.name.trim();
        let slug = self.slug.trim();
        if name.is_empty() || slug.is_empty() {
            return Err(AppError::BadRequest(
                "name and slug are required".to_owned(),
            ));
        }
        Ok((name, slug))
    }
}

/// `GET /api/admin/categories`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminCategory>>, AppError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// `POST /api/admin/categories`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<AdminCategory>), AppError> {
    let (name, slug) = body.validate()?;
    let category = CategoryRepository::new(state.pool())
        .create(name, slug)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /api/admin/categories/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<AdminCategory>, AppError> {
    let (name, slug) = body.validate()?;
    let category = CategoryRepository::new(state.pool())
        .update(CategoryId::new(id), name, slug)
        .await?;
    Ok(Json(category))
}

/// `DELETE /api/admin/categories/{id}`
///
/// Refused with 400 while products still reference the category.
pub async fn destroy(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}
