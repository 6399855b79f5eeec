mod common;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{Value, json};

// ─── SIGNUP ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_signup_returns_session_tokens() {
    let app = common::create_test_app();

    let session = common::signup(&app.server, "ann@example.com").await;

    assert!(!common::access_token(&session).is_empty());
    assert!(!common::refresh_token(&session).is_empty());
    assert_ne!(common::access_token(&session), common::refresh_token(&session));
    assert_eq!(app.state.token_service.cache().len(), 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let app = common::create_test_app();
    common::signup(&app.server, "ann@example.com").await;

    let response = app
        .server
        .post("/signup")
        .json(&json!({
            "name": "Other",
            "email": "ANN@example.com",
            "password": "secret123",
            "repeat_password": "secret123",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/signup")
        .json(&json!({
            "name": "Ann",
            "email": "not-an-email",
            "password": "secret123",
            "repeat_password": "different",
        }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"].get("email").is_some());
    assert!(body["error"]["details"].get("repeat_password").is_some());
}

// ─── SIGNIN ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_signin_success() {
    let app = common::create_test_app();
    common::signup(&app.server, "ann@example.com").await;

    let response = app
        .server
        .post("/auth")
        .json(&json!({ "email": "ann@example.com", "password": "secret123" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let session = response.json::<Value>();
    assert!(session["token"].is_string());
    assert!(session["refresh_token"].is_string());
    assert_eq!(app.state.token_service.cache().len(), 2);
}

#[tokio::test]
async fn test_signin_failures_are_indistinguishable() {
    let app = common::create_test_app();
    common::signup(&app.server, "ann@example.com").await;

    let wrong_password = app
        .server
        .post("/auth")
        .json(&json!({ "email": "ann@example.com", "password": "wrong-password" }))
        .await;
    let unknown_email = app
        .server
        .post("/auth")
        .json(&json!({ "email": "nobody@example.com", "password": "secret123" }))
        .await;

    wrong_password.assert_status_unauthorized();
    unknown_email.assert_status_unauthorized();
    assert_eq!(wrong_password.text(), unknown_email.text());
}

// ─── REFRESH ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    let response = app
        .server
        .put("/auth")
        .json(&json!({ "refresh_token": common::refresh_token(&session) }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let rotated = response.json::<Value>();
    assert_ne!(
        common::refresh_token(&rotated),
        common::refresh_token(&session)
    );

    // The new access token works on protected routes.
    app.server
        .get("/profile")
        .authorization_bearer(common::access_token(&rotated))
        .await
        .assert_status_ok();

    // The old entry was consumed and the new one registered.
    assert_eq!(app.state.token_service.cache().len(), 1);
}

#[tokio::test]
async fn test_refresh_token_is_single_use() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;
    let body = json!({ "refresh_token": common::refresh_token(&session) });

    app.server
        .put("/auth")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    let replay = app.server.put("/auth").json(&body).await;

    replay.assert_status_unauthorized();
    assert_eq!(replay.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_refresh_with_access_token_rejected() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    let response = app
        .server
        .put("/auth")
        .json(&json!({ "refresh_token": common::access_token(&session) }))
        .await;

    response.assert_status_unauthorized();
    // The real refresh token is still live.
    assert_eq!(app.state.token_service.cache().len(), 1);
}

#[tokio::test]
async fn test_expired_refresh_token_rejected() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    app.clock
        .advance(Duration::seconds(common::REFRESH_TTL_SECONDS + 1));

    app.server
        .put("/auth")
        .json(&json!({ "refresh_token": common::refresh_token(&session) }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_evicted_refresh_token_rejected() {
    let app = common::create_test_app_with_capacity(1);
    let first = common::signup(&app.server, "ann@example.com").await;
    common::signup(&app.server, "bob@example.com").await;

    app.server
        .put("/auth")
        .json(&json!({ "refresh_token": common::refresh_token(&first) }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_refresh_failures_share_one_body() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    let garbage = app
        .server
        .put("/auth")
        .json(&json!({ "refresh_token": "garbage" }))
        .await;
    let wrong_kind = app
        .server
        .put("/auth")
        .json(&json!({ "refresh_token": common::access_token(&session) }))
        .await;

    garbage.assert_status_unauthorized();
    wrong_kind.assert_status_unauthorized();
    assert_eq!(garbage.text(), wrong_kind.text());
}

// ─── LOGOUT ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;
    let body = json!({ "refresh_token": common::refresh_token(&session) });

    app.server
        .post("/auth/logout")
        .authorization_bearer(common::access_token(&session))
        .json(&body)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(app.state.token_service.cache().is_empty());
    app.server
        .put("/auth")
        .json(&body)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_logout_cannot_revoke_foreign_token() {
    let app = common::create_test_app();
    let ann = common::signup(&app.server, "ann@example.com").await;
    let bob = common::signup(&app.server, "bob@example.com").await;

    app.server
        .post("/auth/logout")
        .authorization_bearer(common::access_token(&bob))
        .json(&json!({ "refresh_token": common::refresh_token(&ann) }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Ann's session survives.
    app.server
        .put("/auth")
        .json(&json!({ "refresh_token": common::refresh_token(&ann) }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_logout_requires_access_token() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    app.server
        .post("/auth/logout")
        .json(&json!({ "refresh_token": common::refresh_token(&session) }))
        .await
        .assert_status_unauthorized();

    assert_eq!(app.state.token_service.cache().len(), 1);
}
