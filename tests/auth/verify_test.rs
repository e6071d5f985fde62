use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};
use hazel::modules::auth::model::{CredentialRecord, TokenScope};
use hazel::services::hashing;
use hazel::services::mailer::{VERIFY_EMAIL_TEMPLATE, WELCOME_EMAIL_TEMPLATE};

fn wrong_code(code: &str) -> String {
    if code == "000000" { "000001" } else { "000000" }.to_string()
}

#[tokio::test]
async fn verify_with_correct_code_marks_user_verified() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;
    let code = ctx.verification_code(&email).await;

    let response = ctx.verify(&email, &code).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["verified"], true);
    assert!(ctx.store.stored_user(&email).unwrap().verified);
    assert_eq!(ctx.store.credential_count(TokenScope::Verification), 0);
}

#[tokio::test]
async fn verify_with_wrong_code_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;
    let code = ctx.verification_code(&email).await;

    let response = ctx.verify(&email, &wrong_code(&code)).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(!ctx.store.stored_user(&email).unwrap().verified);
}

#[tokio::test]
async fn verification_code_is_single_use() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;
    let code = ctx.verification_code(&email).await;

    ctx.verify(&email, &code).await.assert_status_ok();
    let response = ctx.verify(&email, &code).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verification_code_is_bound_to_its_email() {
    let ctx = TestContext::new().await;
    let ada = test_email();
    let bob = test_email();
    ctx.register("Ada", &ada, test_password()).await;
    ctx.register("Bob", &bob, test_password()).await;
    let ada_code = ctx.verification_code(&ada).await;

    let response = ctx.verify(&bob, &ada_code).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(!ctx.store.stored_user(&bob).unwrap().verified);
}

#[tokio::test]
async fn verify_sends_welcome_email() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;
    let code = ctx.verification_code(&email).await;

    ctx.verify(&email, &code).await.assert_status_ok();

    for _ in 0..100 {
        if !ctx.mailer.sent_to(&email, WELCOME_EMAIL_TEMPLATE).is_empty() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("welcome email was not sent");
}

#[tokio::test]
async fn resend_issues_a_new_code_and_keeps_the_old_one_valid() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada", &email, test_password()).await;
    let first = ctx.verification_code(&email).await;

    let response = ctx
        .server
        .post("/api/v1/auth/verify/request")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    for _ in 0..100 {
        if ctx.mailer.sent_to(&email, VERIFY_EMAIL_TEMPLATE).len() == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(ctx.mailer.sent_to(&email, VERIFY_EMAIL_TEMPLATE).len(), 2);
    assert_eq!(ctx.store.credential_count(TokenScope::Verification), 2);

    ctx.verify(&email, &first).await.assert_status_ok();
}

#[tokio::test]
async fn resend_for_unknown_email_returns_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/v1/auth/verify/request")
        .json(&json!({ "email": test_email() }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resend_for_verified_user_returns_conflict_without_new_code() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;

    let response = ctx
        .server
        .post("/api/v1/auth/verify/request")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(ctx.store.credential_count(TokenScope::Verification), 0);
}

#[tokio::test]
async fn shared_code_is_consumed_only_for_its_owner() {
    let ctx = TestContext::new().await;
    let ada = test_email();
    let bob = test_email();
    ctx.register("Ada", &ada, test_password()).await;
    ctx.register("Bob", &bob, test_password()).await;

    for email in [&ada, &bob] {
        let user = ctx.store.stored_user(email).unwrap();
        ctx.store.put_credential(CredentialRecord {
            token_hash: hashing::hash_token("424242"),
            user_id: user.id,
            scope: TokenScope::Verification,
            expires_at: Utc::now() + Duration::minutes(15),
        });
    }

    ctx.verify(&ada, "424242").await.assert_status_ok();
    ctx.verify(&bob, "424242").await.assert_status_ok();

    assert!(ctx.store.stored_user(&ada).unwrap().verified);
    assert!(ctx.store.stored_user(&bob).unwrap().verified);
}
