//! Integration tests for admin login, lockout, and the audit trail.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p larkspur-admin)
//! - A super admin account matching `SUPER_ADMIN_USERNAME`/`SUPER_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p larkspur-integration-tests -- --ignored

use larkspur_integration_tests::{admin_base_url, admin_login, cookie_client, unique_slug};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Create a throwaway STAFF account through the roster API, returning
/// its username, password, and id.
async fn create_staff_account(admin: &Client) -> (String, String, i64) {
    let username = unique_slug("staff");
    let password = "integration-pass-1".to_string();

    let resp = admin
        .post(format!("{}/api/admin/users", admin_base_url()))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
            "role": "STAFF",
        }))
        .send()
        .await
        .expect("Failed to create staff account");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse account");
    let id = body["id"].as_i64().expect("account id");
    (username, password, id)
}

async fn delete_account(admin: &Client, id: i64) {
    let _ = admin
        .delete(format!("{}/api/admin/users/{id}", admin_base_url()))
        .send()
        .await;
}

async fn attempt_login(client: &Client, identifier: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/admin/login", admin_base_url()))
        .json(&json!({ "identifier": identifier, "password": password }))
        .send()
        .await
        .expect("Failed to send login request")
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn successful_login_sets_both_token_cookies() {
    let client = cookie_client();
    let (username, password) = larkspur_integration_tests::super_admin_credentials();

    let resp = attempt_login(&client, &username, &password).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookies: Vec<String> = resp
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("cookie header").to_owned())
        .collect();

    assert!(cookies.iter().any(|c| c.starts_with("admin_access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("admin_refresh_token=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

    let body: Value = resp.json().await.expect("Failed to parse login body");
    assert_eq!(body["user"]["username"], username.as_str());
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn wrong_password_is_a_generic_401() {
    let admin = admin_login().await;
    let (username, _, id) = create_staff_account(&admin).await;

    let resp = attempt_login(&cookie_client(), &username, "definitely-wrong").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Invalid credentials");

    delete_account(&admin, id).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn unknown_identifier_is_indistinguishable_from_wrong_password() {
    let resp = attempt_login(&cookie_client(), "no-such-admin", "whatever-pass").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn three_failures_lock_the_account_for_thirty_minutes() {
    let admin = admin_login().await;
    let (username, password, id) = create_staff_account(&admin).await;
    let client = cookie_client();

    // Three wrong passwords; all generic 401s.
    for _ in 0..3 {
        let resp = attempt_login(&client, &username, "wrong-password").await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    // Fourth attempt with the CORRECT password is still rejected,
    // because the lockout window is now active.
    let resp = attempt_login(&client, &username, &password).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("locked"),
        "expected lockout message, got: {body}"
    );

    delete_account(&admin, id).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn lockout_attempts_appear_in_the_audit_trail() {
    let admin = admin_login().await;
    let (username, password, id) = create_staff_account(&admin).await;
    let client = cookie_client();

    for _ in 0..3 {
        attempt_login(&client, &username, "wrong-password").await;
    }
    attempt_login(&client, &username, &password).await;

    let resp = admin
        .get(format!("{}/api/admin/audit-log?limit=50", admin_base_url()))
        .send()
        .await
        .expect("Failed to fetch audit log");
    assert_eq!(resp.status(), StatusCode::OK);

    let entries: Vec<Value> = resp.json().await.expect("Failed to parse audit log");
    let mine: Vec<&Value> = entries
        .iter()
        .filter(|e| e["username"] == username.as_str())
        .collect();

    assert!(mine.iter().any(|e| e["outcome"] == "failure"));
    assert!(mine.iter().any(|e| e["outcome"] == "locked"));

    delete_account(&admin, id).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn refresh_rotates_the_access_token() {
    let client = admin_login().await;

    let resp = client
        .post(format!("{}/api/admin/refresh", admin_base_url()))
        .send()
        .await
        .expect("Failed to send refresh request");
    assert_eq!(resp.status(), StatusCode::OK);

    // The refreshed cookies still authorize protected routes.
    let resp = client
        .get(format!("{}/api/admin/dashboard", admin_base_url()))
        .send()
        .await
        .expect("Failed to fetch dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn protected_routes_reject_missing_tokens() {
    let client = cookie_client();

    let resp = client
        .get(format!("{}/api/admin/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded super admin"]
async fn logout_clears_the_cookies() {
    let client = admin_login().await;

    let resp = client
        .post(format!("{}/api/admin/logout", admin_base_url()))
        .send()
        .await
        .expect("Failed to send logout request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/admin/dashboard", admin_base_url()))
        .send()
        .await
        .expect("Failed to fetch dashboard");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
