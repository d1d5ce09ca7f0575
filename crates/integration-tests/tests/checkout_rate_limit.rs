//! Integration tests for the checkout rate limiter.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p larkspur-storefront)
//!
//! Run with: cargo test -p larkspur-integration-tests -- --ignored

use larkspur_integration_tests::{cookie_client, fresh_forwarded_ip, storefront_base_url};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn sixth_checkout_call_in_a_minute_is_rate_limited() {
    let client = cookie_client();
    let ip = fresh_forwarded_ip();
    let url = format!("{}/api/checkout", storefront_base_url());

    // The body is deliberately invalid; the limiter sits in front of the
    // handler, so 400s still consume tokens.
    let body = json!({ "amount": "10.00", "items": [] });

    for call in 1..=5 {
        let resp = client
            .post(&url)
            .header("x-forwarded-for", &ip)
            .json(&body)
            .send()
            .await
            .expect("Failed to send checkout request");
        assert_ne!(
            resp.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "call {call} should not be rate limited yet"
        );
    }

    let resp = client
        .post(&url)
        .header("x-forwarded-for", &ip)
        .json(&body)
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn rate_limit_buckets_are_per_ip() {
    let client = cookie_client();
    let url = format!("{}/api/checkout", storefront_base_url());
    let body = json!({ "amount": "10.00", "items": [] });

    // Exhaust one IP's bucket.
    let first_ip = fresh_forwarded_ip();
    for _ in 0..6 {
        let _ = client
            .post(&url)
            .header("x-forwarded-for", &first_ip)
            .json(&body)
            .send()
            .await
            .expect("Failed to send checkout request");
    }

    // A different IP still gets through.
    let resp = client
        .post(&url)
        .header("x-forwarded-for", fresh_forwarded_ip())
        .json(&body)
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_ne!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
