//! Tests for error handling in the submission pipeline.
//!
//! Each failing gate must map to its one status code and a client-safe
//! body, with internal causes kept out of responses.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    setup::{test_config, TestContext},
};

/// Too-short message returns 400 with a `message` field error.
#[tokio::test]
async fn short_message_returns_field_error() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .json(&fixtures::payload("Jo", "jo@x.com", "too short"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid form data");
    assert!(body["details"]["message"][0]
        .as_str()
        .unwrap()
        .contains("at least 20"));
    assert!(body["details"].get("name").is_none(), "passing fields carry no errors");
    assert!(body["details"].get("email").is_none());
    assert_eq!(ctx.sent_count(), 0);
}

#[tokio::test]
async fn invalid_email_returns_field_error() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .json(&fixtures::payload("Jo", "not-an-email", "A message long enough to pass the check."))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["details"]["email"][0].as_str().is_some());
}

#[tokio::test]
async fn blank_name_returns_field_error() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .json(&fixtures::payload("   ", "jo@example.com", "A message long enough to pass the check."))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["details"]["name"][0].as_str().is_some());
}

/// Every violated field is reported at once so the form can show all
/// errors in one round trip.
#[tokio::test]
async fn field_violations_are_aggregated() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .json(&fixtures::payload("", "nope", "short"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    let details = body["details"].as_object().unwrap();
    assert_eq!(details.len(), 3);
    assert!(details.contains_key("name"));
    assert!(details.contains_key("email"));
    assert!(details.contains_key("message"));
}

/// Undecodable JSON returns 400 with a generic parse-error body.
#[tokio::test]
async fn malformed_json_returns_400() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .content_type("application/json")
        .bytes("not json at all".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid form data");
    assert!(body.get("details").is_none());
}

/// A payload missing a required field cannot be decoded.
#[tokio::test]
async fn missing_field_is_a_parse_failure() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .content_type("application/json")
        .bytes(r#"{"name": "Jo", "email": "jo@example.com"}"#.into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_returns_400() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .content_type("application/json")
        .bytes(fixtures::oversized_payload().into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Verification enabled and the service scores the token below the
/// threshold: 400, and the mailer is never invoked.
#[tokio::test]
async fn low_trust_score_rejects_submission() {
    let mut config = test_config();
    config.verification_enabled = true;
    let ctx = TestContext::with_config(config);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .json(&fixtures::payload_with_token("low-score-token"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Verification failed");
    assert_eq!(ctx.sent_count(), 0, "Notifier must not run after a failed verification");
}

#[tokio::test]
async fn outright_verification_failure_rejects_submission() {
    let mut config = test_config();
    config.verification_enabled = true;
    let ctx = TestContext::with_config(config);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/contact")
        .json(&fixtures::payload_with_token("reject-token"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.sent_count(), 0);
}

/// Delivery failures surface as a generic 500; the transport error never
/// reaches the caller.
#[tokio::test]
async fn delivery_failure_returns_generic_500() {
    let ctx = TestContext::new();
    ctx.set_mailer_failure(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/contact").json(&fixtures::valid_payload()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to send message");
    assert!(
        !body.to_string().contains("Mock mailer failure"),
        "internal diagnostics must not leak"
    );
}
