//! End-to-end tests for per-client rate limiting.

use api::middleware::rate_limit::RateLimitConfig;
use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    setup::{test_config, TestContext},
};
use std::time::Duration;

/// Context with the production rate limit (3 per 60s) instead of the
/// permissive default the other suites use.
fn strict_context() -> TestContext {
    TestContext::with_rate_limit(
        test_config(),
        RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests: 3,
        },
    )
}

/// Four requests from one client inside a window: three pass, the fourth
/// is limited.
#[tokio::test]
async fn fourth_request_in_window_is_limited() {
    let ctx = strict_context();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..3 {
        server
            .post("/contact")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .json(&fixtures::valid_payload())
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/contact")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .json(&fixtures::valid_payload())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Too many requests"));
    assert_eq!(ctx.sent_count(), 3);
}

/// The rate gate runs before parsing, so the fourth request is limited
/// regardless of body validity.
#[tokio::test]
async fn limit_applies_regardless_of_body_validity() {
    let ctx = strict_context();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Three invalid submissions still count against the window
    for _ in 0..3 {
        server
            .post("/contact")
            .add_header("X-Forwarded-For", "203.0.113.8")
            .json(&fixtures::payload("Jo", "jo@x.com", "short"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let response = server
        .post("/contact")
        .add_header("X-Forwarded-For", "203.0.113.8")
        .content_type("application/json")
        .bytes("not even json".into())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn clients_are_limited_independently() {
    let ctx = strict_context();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..4 {
        server
            .post("/contact")
            .add_header("X-Forwarded-For", "203.0.113.9")
            .json(&fixtures::valid_payload())
            .await;
    }

    // A different client is unaffected
    let response = server
        .post("/contact")
        .add_header("X-Forwarded-For", "198.51.100.2")
        .json(&fixtures::valid_payload())
        .await;

    response.assert_status_ok();
}

/// Only the first entry of a forwarded chain identifies the client.
#[tokio::test]
async fn forwarded_chain_uses_first_entry() {
    let ctx = strict_context();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Same origin behind different proxy chains: one bucket
    server
        .post("/contact")
        .add_header("X-Forwarded-For", "203.0.113.10, 10.0.0.1")
        .json(&fixtures::valid_payload())
        .await
        .assert_status_ok();

    for _ in 0..2 {
        server
            .post("/contact")
            .add_header("X-Forwarded-For", "203.0.113.10")
            .json(&fixtures::valid_payload())
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/contact")
        .add_header("X-Forwarded-For", "203.0.113.10, 172.16.0.1")
        .json(&fixtures::valid_payload())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Requests with no forwarding header share the sentinel bucket.
#[tokio::test]
async fn unidentified_clients_share_one_bucket() {
    let ctx = strict_context();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..3 {
        server
            .post("/contact")
            .json(&fixtures::valid_payload())
            .await
            .assert_status_ok();
    }

    let response = server.post("/contact").json(&fixtures::valid_payload()).await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn real_ip_header_is_a_fallback_key() {
    let ctx = strict_context();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..3 {
        server
            .post("/contact")
            .add_header("X-Real-IP", "198.51.100.9")
            .json(&fixtures::valid_payload())
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/contact")
        .add_header("X-Real-IP", "198.51.100.9")
        .json(&fixtures::valid_payload())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}
