use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{json, Value};

use crate::common::{test_email, test_password, TestContext, TEST_SECRET};
use hazel::modules::auth::model::TokenScope;
use hazel::modules::auth::CredentialStore;
use hazel::services::hashing;
use hazel::services::jwt::{TokenIssuer, TokenKind};

#[tokio::test]
async fn login_with_valid_credentials_returns_refresh_token() {
    let ctx = TestContext::new().await;
    let (id, email) = ctx.verified_user("Ada").await;

    let response = ctx.login(&email, test_password()).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], id.to_string());
    assert!(body["refreshToken"].as_str().is_some());
    assert!(body["expiresAt"].as_str().is_some());
    assert_eq!(ctx.store.credential_count(TokenScope::Authentication), 1);

    let refresh = body["refreshToken"].as_str().unwrap();
    let claims = ctx.tokens.validate(refresh, TokenKind::Refresh).unwrap();
    assert_eq!(claims.email, email);
}

#[tokio::test]
async fn login_with_wrong_password_and_unknown_email_look_the_same() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;

    let wrong_password = ctx.login(&email, "wrong-password").await;
    let unknown_email = ctx.login(&test_email(), test_password()).await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json::<Value>(), unknown_email.json::<Value>());
}

#[tokio::test]
async fn login_before_verification_returns_forbidden() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;

    let response = ctx.login(&email, test_password()).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(ctx.store.credential_count(TokenScope::Authentication), 0);
}

#[tokio::test]
async fn refresh_token_mints_access_tokens_repeatedly() {
    let ctx = TestContext::new().await;
    let (id, email) = ctx.verified_user("Ada").await;
    let session: Value = ctx.login(&email, test_password()).await.json();
    let refresh = session["refreshToken"].as_str().unwrap();

    let first = ctx.access(refresh).await;
    let second = ctx.access(refresh).await;

    first.assert_status_ok();
    second.assert_status_ok();
    let body: Value = second.json();
    assert!(body["expiresAt"].as_str().is_some());

    let access = body["accessToken"].as_str().unwrap();
    let claims = ctx.tokens.validate(access, TokenKind::Access).unwrap();
    assert_eq!(claims.subject_id().unwrap(), id);
}

#[tokio::test]
async fn access_token_cannot_be_used_as_refresh_token() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let access = ctx.access_token(&email).await;

    let response = ctx.access(&access).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verification_code_cannot_refresh_a_session() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;
    let code = ctx.verification_code(&email).await;

    let response = ctx.access(&code).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    // The code is still usable for its own purpose.
    ctx.verify(&email, &code).await.assert_status_ok();
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
    let issuer = TokenIssuer::new(TEST_SECRET)
        .unwrap()
        .with_ttls(Duration::hours(2), Duration::zero());
    let ctx = TestContext::with_issuer(issuer).await;
    let (_, email) = ctx.verified_user("Ada").await;
    let session: Value = ctx.login(&email, test_password()).await.json();

    let response = ctx.access(session["refreshToken"].as_str().unwrap()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.metrics.auth_count("refresh", "invalid"), 1);
}

#[tokio::test]
async fn revoked_refresh_token_is_rejected_while_still_signed() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let session: Value = ctx.login(&email, test_password()).await.json();
    let refresh = session["refreshToken"].as_str().unwrap();

    ctx.server
        .post("/api/v1/auth/logout")
        .json(&json!({ "refreshToken": refresh }))
        .await
        .assert_status_ok();

    assert!(ctx.tokens.validate(refresh, TokenKind::Refresh).is_ok());
    let response = ctx.access(refresh).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.store.credential_count(TokenScope::Authentication), 0);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let session: Value = ctx.login(&email, test_password()).await.json();
    let body = json!({ "refreshToken": session["refreshToken"] });

    ctx.server.post("/api/v1/auth/logout").json(&body).await.assert_status_ok();
    ctx.server.post("/api/v1/auth/logout").json(&body).await.assert_status_ok();
}

#[tokio::test]
async fn each_login_is_an_independent_session() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let laptop: Value = ctx.login(&email, test_password()).await.json();
    let phone: Value = ctx.login(&email, test_password()).await.json();
    assert_ne!(laptop["refreshToken"], phone["refreshToken"]);

    ctx.server
        .post("/api/v1/auth/logout")
        .json(&json!({ "refreshToken": laptop["refreshToken"] }))
        .await
        .assert_status_ok();

    ctx.access(phone["refreshToken"].as_str().unwrap())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn refresh_token_is_stored_only_as_digest() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let session: Value = ctx.login(&email, test_password()).await.json();
    let refresh = session["refreshToken"].as_str().unwrap();

    let digest = hashing::hash_token(refresh);
    let owner = CredentialStore::find(ctx.store.as_ref(), &digest, TokenScope::Authentication, &email)
        .await
        .unwrap();
    assert!(owner.is_some());

    let by_raw = CredentialStore::find(ctx.store.as_ref(), refresh, TokenScope::Authentication, &email)
        .await
        .unwrap();
    assert!(by_raw.is_none());
}
