//! Product management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use larkspur_core::{CategoryId, ProductId};

use crate::db::products::{AdminProductFilter, ProductInput, ProductRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::catalog::AdminProduct;
use crate::state::AppState;

// The admin UI submits product forms as flattened payloads, so numeric
// fields can arrive as strings and the image list as a JSON-encoded array.

fn i32_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }
    match Raw::deserialize(de)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn decimal_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<Decimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Decimal),
        Text(String),
    }
    match Raw::deserialize(de)? {
        Raw::Number(d) => Ok(d),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn image_urls_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Encoded(String),
    }
    match Raw::deserialize(de)? {
        Raw::List(urls) => Ok(urls),
        Raw::Encoded(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    name: String,
    slug: String,
    description: String,
    care_instructions: String,
    size_chart: Option<String>,
    #[serde(deserialize_with = "decimal_lenient")]
    price: Decimal,
    #[serde(deserialize_with = "i32_lenient")]
    stock: i32,
    #[serde(default, deserialize_with = "image_urls_lenient")]
    image_urls: Vec<String>,
    #[serde(deserialize_with = "i32_lenient")]
    category_id: i32,
}

impl ProductBody {
    fn validate(&self) -> Result<ProductInput<'_>, AppError> {
        if self.name.trim().is_empty() || self.slug.trim().is_empty() {
            return Err(AppError::BadRequest(
                "name and slug are required".to_owned(),
            ));
        }
        if self.price <= Decimal::ZERO {
            return Err(AppError::BadRequest("price must be positive".to_owned()));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest(
                "stock cannot be negative".to_owned(),
            ));
        }

        Ok(ProductInput {
            name: self.name.trim(),
            slug: self.slug.trim(),
            description: &self.description,
            care_instructions: &self.care_instructions,
            size_chart: self.size_chart.as_deref(),
            price: self.price,
            stock: self.stock,
            image_urls: &self.image_urls,
            category_id: CategoryId::new(self.category_id),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    category_id: Option<i32>,
    page: Option<u32>,
    limit: Option<u32>,
}

/// `GET /api/admin/products`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AdminProduct>>, AppError> {
    let filter = AdminProductFilter {
        search: query.q.filter(|q| !q.trim().is_empty()),
        category_id: query.category_id.map(CategoryId::new),
        page: query.page,
        limit: query.limit,
    };
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// `GET /api/admin/products/{id}`
pub async fn show(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AdminProduct>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;
    Ok(Json(product))
}

/// `POST /api/admin/products`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<AdminProduct>), AppError> {
    let input = body.validate()?;
    let product = ProductRepository::new(state.pool())
        .create(input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::BadRequest("category does not exist".to_owned())
            }
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductBody>,
) -> Result<Json<AdminProduct>, AppError> {
    let input = body.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), input)
        .await?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct StockBody {
    stock: i32,
}

/// `PUT /api/admin/products/{id}/stock`
pub async fn set_stock(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StockBody>,
) -> Result<Json<AdminProduct>, AppError> {
    if body.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_owned()));
    }
    let product = ProductRepository::new(state.pool())
        .set_stock(ProductId::new(id), body.stock)
        .await?;
    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}`
pub async fn destroy(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_body_accepts_native_types() {
        let body: ProductBody = serde_json::from_value(json!({
            "name": "Ceramic vase",
            "slug": "ceramic-vase",
            "description": "Hand-thrown stoneware.",
            "care_instructions": "Wipe with a dry cloth.",
            "price": 499.0,
            "stock": 7,
            "image_urls": ["https://cdn.example/vase.jpg"],
            "category_id": 3
        }))
        .unwrap();

        assert_eq!(body.stock, 7);
        assert_eq!(body.category_id, 3);
        assert_eq!(body.image_urls.len(), 1);
    }

    #[test]
    fn product_body_coerces_flattened_form_fields() {
        let body: ProductBody = serde_json::from_value(json!({
            "name": "Ceramic vase",
            "slug": "ceramic-vase",
            "description": "Hand-thrown stoneware.",
            "care_instructions": "Wipe with a dry cloth.",
            "price": "499.00",
            "stock": " 7 ",
            "image_urls": "[\"https://cdn.example/vase.jpg\"]",
            "category_id": "3"
        }))
        .unwrap();

        assert_eq!(body.price, Decimal::new(49_900, 2));
        assert_eq!(body.stock, 7);
        assert_eq!(body.category_id, 3);
        assert_eq!(body.image_urls, vec!["https://cdn.example/vase.jpg"]);
    }

    #[test]
    fn product_body_rejects_garbage_numerics() {
        let result: Result<ProductBody, _> = serde_json::from_value(json!({
            "name": "Ceramic vase",
            "slug": "ceramic-vase",
            "description": "",
            "care_instructions": "",
            "price": "lots",
            "stock": 1,
            "category_id": 3
        }));

        assert!(result.is_err());
    }

    #[test]
    fn missing_image_urls_defaults_to_empty() {
        let body: ProductBody = serde_json::from_value(json!({
            "name": "Ceramic vase",
            "slug": "ceramic-vase",
            "description": "",
            "care_instructions": "",
            "price": "10.00",
            "stock": 0,
            "category_id": 1
        }))
        .unwrap();

        assert!(body.image_urls.is_empty());
    }
}
