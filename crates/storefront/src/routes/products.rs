//! Catalog route handlers: products, categories, and reviews.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::products::ProductFilter;
use crate::db::{CategoryRepository, ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireShopper;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive name search.
    pub q: Option<String>,
    /// Category slug filter.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// `GET /api/products` - list products with optional search and filters.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let filter = ProductFilter {
        search: query.q,
        category_slug: query.category,
        page: query.page,
        limit: query.limit,
    };

    let products = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(json!({ "products": products })))
}

/// `GET /api/products/{slug}` - product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with slug '{slug}'")))?;

    Ok(Json(json!({ "product": product })))
}

/// `GET /api/categories` - list all categories.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Value>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(Json(json!({ "categories": categories })))
}

/// `GET /api/products/{slug}/reviews` - reviews for a product, newest first.
pub async fn reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with slug '{slug}'")))?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product.id)
        .await?;

    Ok(Json(json!({ "reviews": reviews })))
}

#[derive(Debug, Deserialize)]
pub struct NewReviewRequest {
    pub rating: i32,
    pub comment: String,
}

/// `POST /api/products/{slug}/reviews` - leave a review (requires login).
pub async fn create_review(
    State(state): State<AppState>,
    RequireShopper(shopper): RequireShopper,
    Path(slug): Path<String>,
    Json(body): Json<NewReviewRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ));
    }
    if body.comment.trim().is_empty() {
        return Err(AppError::BadRequest("comment must not be empty".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with slug '{slug}'")))?;

    let review = ReviewRepository::new(state.pool())
        .create(product.id, shopper.id, body.rating, body.comment.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "review": review }))))
}
