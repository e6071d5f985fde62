use axum::http::{header, HeaderValue, StatusCode};
use chrono::Duration;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::TestContext;
use hazel::services::jwt::TokenKind;

#[tokio::test]
async fn protected_route_without_header_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/v1/workspaces/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn protected_route_with_invalid_token_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/api/v1/workspaces/me")
        .authorization_bearer("invalid-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_empty_token_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/api/v1/workspaces/me")
        .authorization_bearer("")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_wrong_scheme_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let token = ctx
        .tokens
        .issue_access(Uuid::new_v4(), "ada@x.com")
        .unwrap()
        .token;

    let response = ctx
        .server
        .get("/api/v1/workspaces/me")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Token {token}")).unwrap(),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_accepted_as_bearer() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let session: Value = ctx.login(&email, crate::common::test_password()).await.json();

    let response = ctx
        .server
        .get("/api/v1/workspaces/me")
        .authorization_bearer(session["refreshToken"].as_str().unwrap())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_access_token_is_rejected() {
    let ctx = TestContext::new().await;
    let expired = ctx
        .tokens
        .issue(Uuid::new_v4(), "ada@x.com", TokenKind::Access, Duration::zero())
        .unwrap()
        .token;

    let response = ctx
        .server
        .get("/api/v1/workspaces/me")
        .authorization_bearer(&expired)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_access_token_passes_the_gate() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.signed_in_user("Ada").await;

    let response = ctx
        .server
        .get("/api/v1/workspaces/me")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let ctx = TestContext::new().await;

    ctx.server.get("/api/v1/ping").await.assert_status_ok();
    ctx.server.get("/health").await.assert_status_ok();

    let metrics = ctx.server.get("/metrics").await;
    metrics.assert_status_ok();
    assert!(metrics.text().contains("hazel_http_requests_total"));

    ctx.server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "password1" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_requests_still_carry_security_headers() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/v1/workspaces/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    assert_eq!(response.header(header::X_FRAME_OPTIONS), "DENY");
    assert_eq!(response.header(header::CACHE_CONTROL), "no-store");
}
