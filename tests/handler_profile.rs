mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_get_profile() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "Ann@Example.com").await;

    let response = app
        .server
        .get("/profile")
        .authorization_bearer(common::access_token(&session))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["name"], "Test User");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_update_name_and_email() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;
    let token = common::access_token(&session);

    app.server
        .patch("/profile")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Annie", "email": "annie@example.com" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = app
        .server
        .get("/profile")
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(body["name"], "Annie");
    assert_eq!(body["email"], "annie@example.com");
}

#[tokio::test]
async fn test_update_email_taken() {
    let app = common::create_test_app();
    common::signup(&app.server, "bob@example.com").await;
    let session = common::signup(&app.server, "ann@example.com").await;

    app.server
        .patch("/profile")
        .authorization_bearer(common::access_token(&session))
        .json(&json!({ "email": "bob@example.com" }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_change_password() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    app.server
        .patch("/profile")
        .authorization_bearer(common::access_token(&session))
        .json(&json!({ "old_password": "secret123", "new_password": "better456" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .post("/auth")
        .json(&json!({ "email": "ann@example.com", "password": "secret123" }))
        .await
        .assert_status_unauthorized();
    app.server
        .post("/auth")
        .json(&json!({ "email": "ann@example.com", "password": "better456" }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_change_password_wrong_old_password() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    app.server
        .patch("/profile")
        .authorization_bearer(common::access_token(&session))
        .json(&json!({ "old_password": "nope-nope", "new_password": "better456" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_empty_update_rejected() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;

    app.server
        .patch("/profile")
        .authorization_bearer(common::access_token(&session))
        .json(&json!({}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_profile_removes_links() {
    let app = common::create_test_app();
    let session = common::signup(&app.server, "ann@example.com").await;
    let token = common::access_token(&session);

    app.server
        .post("/links")
        .authorization_bearer(&token)
        .json(&json!({ "full_version": "https://example.com/a" }))
        .await
        .assert_status(StatusCode::CREATED);

    app.server
        .delete("/profile")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(app.store.link_count(), 0);

    // The access token still verifies but no longer has an account behind it.
    app.server
        .get("/profile")
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_profile_revokes_refresh_tokens() {
    let app = common::create_test_app();
    let bob = common::signup(&app.server, "bob@example.com").await;
    let session = common::signup(&app.server, "ann@example.com").await;
    let second = app
        .server
        .post("/auth")
        .json(&json!({ "email": "ann@example.com", "password": "secret123" }))
        .await
        .json::<Value>();

    app.server
        .delete("/profile")
        .authorization_bearer(common::access_token(&session))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    for refresh in [common::refresh_token(&session), common::refresh_token(&second)] {
        app.server
            .put("/auth")
            .json(&json!({ "refresh_token": refresh }))
            .await
            .assert_status_unauthorized();
    }

    // Other accounts keep their sessions.
    assert_eq!(app.state.token_service.cache().len(), 1);
    app.server
        .put("/auth")
        .json(&json!({ "refresh_token": common::refresh_token(&bob) }))
        .await
        .assert_status(StatusCode::CREATED);
}
