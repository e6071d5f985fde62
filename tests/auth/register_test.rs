use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};
use hazel::modules::auth::model::TokenScope;
use hazel::services::mailer::VERIFY_EMAIL_TEMPLATE;

#[tokio::test]
async fn register_with_valid_data_returns_created() {
    let ctx = TestContext::new().await;
    let email = test_email();

    let response = ctx.register("Ada", &email, test_password()).await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["verified"], false);
    assert!(body["user"].get("createdAt").is_some());
    assert!(body["user"].get("lastModified").is_some());
    assert!(body["user"].get("password").is_none()); // Hash never leaves the service
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_stores_hashed_code_and_mails_the_raw_one() {
    let ctx = TestContext::new().await;
    let email = test_email();

    ctx.register("Ada", &email, test_password()).await;
    let code = ctx.verification_code(&email).await;

    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(ctx.store.credential_count(TokenScope::Verification), 1);
    assert_eq!(ctx.mailer.sent_to(&email, VERIFY_EMAIL_TEMPLATE).len(), 1);

    let user = ctx.store.stored_user(&email).unwrap();
    assert_ne!(user.password_hash, test_password());
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn register_with_duplicate_email_returns_conflict() {
    let ctx = TestContext::new().await;
    let email = test_email();

    ctx.register("Ada", &email, test_password())
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx.register("Someone Else", &email, "another-pass").await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert!(body.get("error").is_some());
    assert_eq!(ctx.metrics.auth_count("register", "duplicate"), 1);
}

#[tokio::test]
async fn register_with_invalid_email_returns_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx.register("Ada", "invalid-email", test_password()).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_with_short_password_returns_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx.register("Ada", &test_email(), "short").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(ctx.store.credential_count(TokenScope::Verification) == 0);
}

#[tokio::test]
async fn register_with_malformed_json_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/v1/auth/register")
        .json(&json!({ "name": "Ada" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
