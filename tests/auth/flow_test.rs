use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::TestContext;

/// Register, verify, log in, refresh, then call a protected route.
#[tokio::test]
async fn full_account_lifecycle() {
    let ctx = TestContext::new().await;

    let registered = ctx.register("Ada", "ada@x.com", "password1").await;
    registered.assert_status(StatusCode::CREATED);
    let body: Value = registered.json();
    assert_eq!(body["user"]["verified"], false);

    let code = ctx.verification_code("ada@x.com").await;
    let wrong = if code == "999999" { "000000" } else { "999999" };
    ctx.verify("ada@x.com", wrong)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let verified = ctx.verify("ada@x.com", &code).await;
    verified.assert_status_ok();
    assert_eq!(verified.json::<Value>()["user"]["verified"], true);

    let login = ctx.login("ada@x.com", "password1").await;
    login.assert_status_ok();
    let session: Value = login.json();
    let refresh = session["refreshToken"].as_str().unwrap();
    assert!(session["expiresAt"].as_str().is_some());

    let access = ctx.access(refresh).await;
    access.assert_status_ok();
    let access: Value = access.json();
    let token = access["accessToken"].as_str().unwrap();
    assert!(access["expiresAt"].as_str().is_some());

    let created = ctx
        .server
        .post("/api/v1/workspaces")
        .authorization_bearer(token)
        .json(&json!({ "name": "Analytical Engine", "description": "notes" }))
        .await;
    created.assert_status(StatusCode::CREATED);

    ctx.server
        .get("/api/v1/workspaces/me")
        .authorization_bearer(token)
        .await
        .assert_status_ok();

    assert_eq!(ctx.metrics.auth_count("register", "success"), 1);
    assert_eq!(ctx.metrics.auth_count("verify", "invalid"), 1);
    assert_eq!(ctx.metrics.auth_count("verify", "success"), 1);
    assert_eq!(ctx.metrics.auth_count("login", "success"), 1);
    assert_eq!(ctx.metrics.auth_count("refresh", "success"), 1);
}
