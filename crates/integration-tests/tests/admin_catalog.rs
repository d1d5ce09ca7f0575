//! Integration tests for admin catalog management and roster rules.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p larkspur-admin)
//! - A super admin account matching `SUPER_ADMIN_USERNAME`/`SUPER_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p larkspur-integration-tests -- --ignored

use larkspur_integration_tests::{
    admin_base_url, admin_login, create_category, create_product, super_admin_credentials,
    unique_slug,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn category_with_products_cannot_be_deleted() {
    let admin = admin_login().await;

    let category = create_category(&admin, "Integration Shelf", &unique_slug("shelf")).await;
    let category_id = category["id"].as_i64().expect("category id");
    let product = create_product(&admin, &unique_slug("mug"), category_id, 3).await;
    let product_id = product["id"].as_i64().expect("product id");

    // Refused while the product still references it.
    let resp = admin
        .delete(format!(
            "{}/api/admin/categories/{category_id}",
            admin_base_url()
        ))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The category is untouched.
    let resp = admin
        .get(format!("{}/api/admin/categories", admin_base_url()))
        .send()
        .await
        .expect("Failed to list categories");
    let categories: Vec<Value> = resp.json().await.expect("Failed to parse categories");
    assert!(
        categories
            .iter()
            .any(|c| c["id"].as_i64() == Some(category_id))
    );

    // After removing the product, deletion goes through.
    let resp = admin
        .delete(format!(
            "{}/api/admin/products/{product_id}",
            admin_base_url()
        ))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = admin
        .delete(format!(
            "{}/api/admin/categories/{category_id}",
            admin_base_url()
        ))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn stock_can_be_set_directly() {
    let admin = admin_login().await;

    let category = create_category(&admin, "Stockroom", &unique_slug("stockroom")).await;
    let category_id = category["id"].as_i64().expect("category id");
    let product = create_product(&admin, &unique_slug("vase"), category_id, 1).await;
    let product_id = product["id"].as_i64().expect("product id");

    let resp = admin
        .put(format!(
            "{}/api/admin/products/{product_id}/stock",
            admin_base_url()
        ))
        .json(&json!({ "stock": 42 }))
        .send()
        .await
        .expect("Failed to set stock");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body["stock"], 42);

    // Negative stock is refused.
    let resp = admin
        .put(format!(
            "{}/api/admin/products/{product_id}/stock",
            admin_base_url()
        ))
        .json(&json!({ "stock": -1 }))
        .send()
        .await
        .expect("Failed to send stock request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Cleanup.
    let _ = admin
        .delete(format!(
            "{}/api/admin/products/{product_id}",
            admin_base_url()
        ))
        .send()
        .await;
    let _ = admin
        .delete(format!(
            "{}/api/admin/categories/{category_id}",
            admin_base_url()
        ))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn duplicate_category_slug_is_a_conflict() {
    let admin = admin_login().await;
    let slug = unique_slug("dup");

    let category = create_category(&admin, "First", &slug).await;
    let category_id = category["id"].as_i64().expect("category id");

    let resp = admin
        .post(format!("{}/api/admin/categories", admin_base_url()))
        .json(&json!({ "name": "Second", "slug": slug }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let _ = admin
        .delete(format!(
            "{}/api/admin/categories/{category_id}",
            admin_base_url()
        ))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn admins_cannot_delete_their_own_account() {
    let admin = admin_login().await;
    let (username, _) = super_admin_credentials();

    // Find our own id in the roster.
    let resp = admin
        .get(format!("{}/api/admin/users", admin_base_url()))
        .send()
        .await
        .expect("Failed to list admin users");
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<Value> = resp.json().await.expect("Failed to parse roster");
    let own_id = users
        .iter()
        .find(|u| u["username"] == username.as_str())
        .and_then(|u| u["id"].as_i64())
        .expect("own account in roster");

    let resp = admin
        .delete(format!("{}/api/admin/users/{own_id}", admin_base_url()))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Still in the roster.
    let resp = admin
        .get(format!("{}/api/admin/users", admin_base_url()))
        .send()
        .await
        .expect("Failed to list admin users");
    let users: Vec<Value> = resp.json().await.expect("Failed to parse roster");
    assert!(users.iter().any(|u| u["id"].as_i64() == Some(own_id)));
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn unknown_order_status_is_rejected() {
    let admin = admin_login().await;

    // Whether or not order 1 exists, an unknown status never reaches
    // the database.
    let resp = admin
        .put(format!("{}/api/admin/orders/1/status", admin_base_url()))
        .json(&json!({ "status": "TELEPORTED" }))
        .send()
        .await
        .expect("Failed to send status request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn moving_a_missing_order_is_a_404() {
    let admin = admin_login().await;

    // The guarded update touches zero rows; the follow-up read reports
    // the order as missing rather than terminal.
    let resp = admin
        .put(format!(
            "{}/api/admin/orders/987654321/status",
            admin_base_url()
        ))
        .json(&json!({ "status": "SHIPPED" }))
        .send()
        .await
        .expect("Failed to send status request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
