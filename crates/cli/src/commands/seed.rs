//! Seed the catalog from a YAML file.
//!
//! # File Format
//!
//! ```yaml
//! categories:
//!   - name: Scarves
//!     slug: scarves
//! products:
//!   - name: Indigo Block-Print Scarf
//!     slug: indigo-block-print-scarf
//!     description: Hand-dyed cotton scarf.
//!     care_instructions: Cold hand wash only.
//!     price: "1499.00"
//!     stock: 12
//!     image_urls:
//!       - https://cdn.example.com/scarf-1.jpg
//!     category_slug: scarves
//! ```
//!
//! Existing slugs are left untouched, so re-running is safe.

use std::path::Path;

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

use larkspur_admin::db;

#[derive(Debug, Deserialize)]
struct CatalogSeed {
    #[serde(default)]
    categories: Vec<CategorySeed>,
    #[serde(default)]
    products: Vec<ProductSeed>,
}

#[derive(Debug, Deserialize)]
struct CategorySeed {
    name: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct ProductSeed {
    name: String,
    slug: String,
    description: String,
    #[serde(default)]
    care_instructions: String,
    size_chart: Option<String>,
    price: Decimal,
    stock: i32,
    #[serde(default)]
    image_urls: Vec<String>,
    category_slug: String,
}

/// Seed categories and products from a YAML file.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file
/// cannot be read or parsed, or a database write fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "DATABASE_URL not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog seed from file");

    let content = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;

    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        "Parsed seed file"
    );

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut categories_inserted = 0u32;
    for category in &seed.categories {
        let result = sqlx::query(
            "INSERT INTO category (name, slug) VALUES ($1, $2)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .execute(&pool)
        .await?;
        categories_inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    let mut products_inserted = 0u32;
    for product in &seed.products {
        let category_id = sqlx::query_scalar::<_, i32>("SELECT id FROM category WHERE slug = $1")
            .bind(&product.category_slug)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| {
                format!(
                    "Product '{}' references unknown category '{}'",
                    product.slug, product.category_slug
                )
            })?;

        let result = sqlx::query(
            "INSERT INTO product
                 (name, slug, description, care_instructions, size_chart, price,
                  stock, image_urls, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(&product.care_instructions)
        .bind(product.size_chart.as_deref())
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.image_urls)
        .bind(category_id)
        .execute(&pool)
        .await?;
        products_inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    info!("Seeding complete!");
    info!(
        "  Categories inserted: {} (skipped {})",
        categories_inserted,
        seed.categories.len() as u32 - categories_inserted
    );
    info!(
        "  Products inserted: {} (skipped {})",
        products_inserted,
        seed.products.len() as u32 - products_inserted
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_file_parses() {
        let yaml = r#"
categories:
  - name: Scarves
    slug: scarves
products:
  - name: Indigo Scarf
    slug: indigo-scarf
    description: Hand-dyed cotton scarf.
    price: "1499.00"
    stock: 12
    category_slug: scarves
"#;
        let seed: CatalogSeed = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(seed.categories.len(), 1);
        assert_eq!(seed.products.len(), 1);
        assert_eq!(seed.products[0].price, Decimal::new(1_499_00, 2));
        assert!(seed.products[0].image_urls.is_empty());
    }

    #[test]
    fn empty_seed_file_is_valid() {
        let seed: CatalogSeed = serde_yaml::from_str("{}").expect("parse");
        assert!(seed.categories.is_empty());
        assert!(seed.products.is_empty());
    }
}
