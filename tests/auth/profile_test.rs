use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{test_password, TestContext};

#[tokio::test]
async fn get_user_returns_public_profile() {
    let ctx = TestContext::new().await;
    let (id, token) = ctx.signed_in_user("Ada").await;

    let response = ctx
        .server
        .get(&format!("/api/v1/users/{id}"))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["name"], "Ada");
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn get_unknown_user_returns_not_found() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.signed_in_user("Ada").await;

    let response = ctx
        .server
        .get(&format!("/api/v1/users/{}", Uuid::new_v4()))
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_profile_changes_only_given_fields() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let token = ctx.access_token(&email).await;
    let before = ctx.store.stored_user(&email).unwrap();

    let response = ctx
        .server
        .patch("/api/v1/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Ada Lovelace", "profilePhoto": "https://cdn.example.com/ada.png" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["profilePhoto"], "https://cdn.example.com/ada.png");
    assert_eq!(body["email"], email.as_str());

    let after = ctx.store.stored_user(&email).unwrap();
    assert_eq!(after.password_hash, before.password_hash);
    assert!(after.verified);
}

#[tokio::test]
async fn patch_with_weak_password_returns_unprocessable() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let token = ctx.access_token(&email).await;

    let response = ctx
        .server
        .patch("/api/v1/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "password": "short" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn patch_with_same_password_keeps_hash() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let token = ctx.access_token(&email).await;
    let before = ctx.store.stored_user(&email).unwrap();

    ctx.server
        .patch("/api/v1/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "password": test_password() }))
        .await
        .assert_status_ok();

    assert_eq!(ctx.store.stored_user(&email).unwrap().password_hash, before.password_hash);
}

#[tokio::test]
async fn patch_with_new_password_rehashes_and_login_uses_it() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let token = ctx.access_token(&email).await;

    ctx.server
        .patch("/api/v1/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "password": "new-password-42" }))
        .await
        .assert_status_ok();

    ctx.login(&email, test_password())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    ctx.login(&email, "new-password-42").await.assert_status_ok();
}

#[tokio::test]
async fn patch_to_taken_email_returns_conflict() {
    let ctx = TestContext::new().await;
    let (_, taken) = ctx.verified_user("Bob").await;
    let (_, token) = ctx.signed_in_user("Ada").await;

    let response = ctx
        .server
        .patch("/api/v1/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "email": taken }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn patch_cannot_set_verified_flag() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.signed_in_user("Ada").await;

    let response = ctx
        .server
        .patch("/api/v1/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "verified": false }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_own_account() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.verified_user("Ada").await;
    let token = ctx.access_token(&email).await;
    let id = ctx.store.stored_user(&email).unwrap().id;

    ctx.server
        .delete(&format!("/api/v1/users/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    assert!(ctx.store.stored_user(&email).is_none());
    ctx.login(&email, test_password())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_someone_else_is_forbidden() {
    let ctx = TestContext::new().await;
    let (bob, bob_email) = ctx.verified_user("Bob").await;
    let (_, token) = ctx.signed_in_user("Ada").await;

    let response = ctx
        .server
        .delete(&format!("/api/v1/users/{bob}"))
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(ctx.store.stored_user(&bob_email).is_some());
}

#[tokio::test]
async fn delete_twice_returns_not_found() {
    let ctx = TestContext::new().await;
    let (id, token) = ctx.signed_in_user("Ada").await;

    ctx.server
        .delete(&format!("/api/v1/users/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    // The access token is stateless and outlives the account.
    ctx.server
        .delete(&format!("/api/v1/users/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
