//! Integration tests for the shopper-facing API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p larkspur-storefront)
//!
//! Run with: cargo test -p larkspur-integration-tests -- --ignored

use larkspur_integration_tests::{
    admin_login, cookie_client, create_category, create_product, shopper_login,
    storefront_base_url, unique_email, unique_slug,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with a seeded super admin"]
async fn product_search_matches_on_the_q_parameter() {
    let admin = admin_login().await;
    let category = create_category(&admin, "Search Fixtures", &unique_slug("search-cat")).await;
    let slug = unique_slug("searchable");
    let product = create_product(&admin, &slug, category["id"].as_i64().expect("id"), 5).await;

    let resp = cookie_client()
        .get(format!("{}/api/products?q={slug}", storefront_base_url()))
        .send()
        .await
        .expect("Failed to search products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse products");
    let products = body["products"].as_array().expect("products array");
    assert!(
        products.iter().any(|p| p["slug"] == slug.as_str()),
        "expected '{slug}' in search results, got: {body}"
    );

    // A nonsense query finds nothing.
    let resp = cookie_client()
        .get(format!(
            "{}/api/products?q=zzz-no-such-product",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to search products");
    let body: Value = resp.json().await.expect("Failed to parse products");
    assert!(body["products"].as_array().expect("products array").is_empty());

    let admin_base = larkspur_integration_tests::admin_base_url();
    let _ = admin
        .delete(format!("{admin_base}/api/admin/products/{}", product["id"]))
        .send()
        .await;
    let _ = admin
        .delete(format!(
            "{admin_base}/api/admin/categories/{}",
            category["id"]
        ))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn register_login_and_me_round_trip() {
    let client = cookie_client();
    let email = unique_email();
    let base = storefront_base_url();

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["shopper"]["email"], email.as_str());

    // Logout drops the session.
    let resp = client
        .post(format!("{base}/api/auth/logout"))
        .send()
        .await
        .expect("Failed to logout");
    assert!(resp.status().is_success());

    let resp = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert!(body["shopper"].is_null());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn duplicate_registration_is_a_conflict() {
    let client = cookie_client();
    let email = unique_email();
    let base = storefront_base_url();

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = cookie_client()
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "integration-pass-2" }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn wishlist_requires_a_session() {
    let resp = cookie_client()
        .get(format!("{}/api/wishlist", storefront_base_url()))
        .send()
        .await
        .expect("Failed to send wishlist request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server with seeded catalog"]
async fn wishlist_toggle_adds_then_removes() {
    let (client, _) = shopper_login().await;
    let base = storefront_base_url();

    // Any existing product works; grab the first one from the catalog.
    let resp = client
        .get(format!("{base}/api/products?limit=1"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse products");
    let product_id = body["products"][0]["id"]
        .as_i64()
        .expect("at least one seeded product");

    let resp = client
        .post(format!("{base}/api/wishlist"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to toggle wishlist");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse toggle");
    assert_eq!(body["added"], true);

    let resp = client
        .post(format!("{base}/api/wishlist"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to toggle wishlist");
    let body: Value = resp.json().await.expect("Failed to parse toggle");
    assert_eq!(body["added"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn unknown_coupon_is_reported_invalid() {
    let resp = cookie_client()
        .get(format!(
            "{}/api/coupons/validate?code=NO-SUCH-CODE",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to validate coupon");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse validation");
    assert_eq!(body["valid"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn forged_payment_signature_persists_nothing() {
    let (client, _) = shopper_login().await;
    let base = storefront_base_url();

    let resp = client
        .post(format!("{base}/api/verify"))
        .json(&json!({
            "razorpay_order_id": "order_forged123",
            "razorpay_payment_id": "pay_forged123",
            "razorpay_signature": "deadbeef",
            "order": {
                "address": {
                    "recipient": "Test Shopper",
                    "line1": "1 Test Lane",
                    "line2": null,
                    "city": "Pune",
                    "state": "MH",
                    "postal_code": "411001",
                    "country": "IN",
                    "phone": "9999999999",
                },
                "items": [{ "product_id": 1, "quantity": 1 }],
                "total": "499.00",
            },
        }))
        .send()
        .await
        .expect("Failed to send verify request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse verify body");
    assert_eq!(body["success"], false);

    // No order appears in the shopper's history.
    let resp = client
        .get(format!("{base}/api/account/orders"))
        .send()
        .await
        .expect("Failed to fetch orders");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse orders");
    let orders = body["orders"].as_array().expect("orders array");
    assert!(orders.is_empty());
}
