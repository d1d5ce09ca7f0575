//! Integration test helpers for Larkspur.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p larkspur-cli -- migrate
//!
//! # Start both servers
//! cargo run -p larkspur-storefront &
//! cargo run -p larkspur-admin &
//!
//! # Run the ignored integration tests
//! cargo test -p larkspur-integration-tests -- --ignored
//! ```
//!
//! Tests assume a super admin account exists (see `SUPER_ADMIN_USERNAME`
//! / `SUPER_ADMIN_PASSWORD`); create one with
//! `cargo run -p larkspur-cli -- admin create`.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Super admin credentials used by the admin tests.
#[must_use]
pub fn super_admin_credentials() -> (String, String) {
    (
        std::env::var("SUPER_ADMIN_USERNAME").unwrap_or_else(|_| "superadmin".to_string()),
        std::env::var("SUPER_ADMIN_PASSWORD").unwrap_or_else(|_| "larkspur-dev-only".to_string()),
    )
}

/// A random documentation-range IP for the `X-Forwarded-For` header, so
/// each client gets its own rate-limit bucket.
#[must_use]
pub fn fresh_forwarded_ip() -> String {
    let tail = uuid::Uuid::new_v4().as_u128();
    format!("203.0.{}.{}", (tail >> 8) % 200 + 1, tail % 200 + 1)
}

/// A client that keeps cookies between requests, like a browser.
///
/// Sends a unique `X-Forwarded-For` so concurrent tests do not share
/// rate-limit buckets; per-request headers still override it.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn cookie_client() -> Client {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        fresh_forwarded_ip().parse().expect("valid header value"),
    );
    Client::builder()
        .cookie_store(true)
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// A fresh email address for registering a throwaway shopper.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Log in to the admin API; the returned client carries the token cookies.
///
/// # Panics
///
/// Panics if the login request fails or is rejected.
pub async fn admin_login() -> Client {
    let client = cookie_client();
    let (username, password) = super_admin_credentials();

    let resp = client
        .post(format!("{}/api/admin/login", admin_base_url()))
        .json(&json!({ "identifier": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(
        resp.status().is_success(),
        "admin login failed: {}",
        resp.status()
    );
    client
}

/// Register and log in a throwaway shopper; returns the client and email.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn shopper_login() -> (Client, String) {
    let client = cookie_client();
    let email = unique_email();

    let resp = client
        .post(format!("{}/api/auth/register", storefront_base_url()))
        .json(&json!({ "email": email, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to send register request");

    assert!(
        resp.status().is_success(),
        "shopper registration failed: {}",
        resp.status()
    );
    (client, email)
}

/// Create a category through the admin API and return its JSON.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_category(admin: &Client, name: &str, slug: &str) -> Value {
    let resp = admin
        .post(format!("{}/api/admin/categories", admin_base_url()))
        .json(&json!({ "name": name, "slug": slug }))
        .send()
        .await
        .expect("Failed to create category");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse category")
}

/// Create a product through the admin API and return its JSON.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(admin: &Client, slug: &str, category_id: i64, stock: i32) -> Value {
    let resp = admin
        .post(format!("{}/api/admin/products", admin_base_url()))
        .json(&json!({
            "name": format!("Test Product {slug}"),
            "slug": slug,
            "description": "Integration test product",
            "care_instructions": "None",
            "price": "499.00",
            "stock": stock,
            "image_urls": [],
            "category_id": category_id,
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product")
}

/// A unique slug for throwaway catalog rows.
#[must_use]
pub fn unique_slug(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
