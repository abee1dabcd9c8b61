mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_user_requires_admin_role() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "editor@beacon.example", &["EDITOR".to_string()])
        .unwrap();

    let (status, body) = common::post_json(
        app,
        "/api/admin/users",
        json!({ "email": "new@beacon.example", "password": "longenough", "roles": ["EDITOR"] }),
        &[("authorization", &format!("Bearer {}", token))],
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn create_user_rejects_unknown_roles() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "admin@beacon.example", &["ADMIN".to_string()])
        .unwrap();

    let (status, body) = common::post_json(
        app,
        "/api/admin/users",
        json!({ "email": "new@beacon.example", "password": "longenough", "roles": ["SUPERUSER"] }),
        &[("authorization", &format!("Bearer {}", token))],
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["details"]["field"], "roles");
    assert_eq!(body["error"]["details"]["unknown"], json!(["SUPERUSER"]));
    Ok(())
}

#[tokio::test]
async fn create_user_rejects_short_password() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "admin@beacon.example", &["ADMIN".to_string()])
        .unwrap();

    let (status, body) = common::post_json(
        app,
        "/api/admin/users",
        json!({ "email": "new@beacon.example", "password": "short", "roles": [] }),
        &[("authorization", &format!("Bearer {}", token))],
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["field"], "password");
    Ok(())
}

#[tokio::test]
async fn create_user_rejects_invalid_email() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "admin@beacon.example", &["ADMIN".to_string()])
        .unwrap();

    let (status, body) = common::post_json(
        app,
        "/api/admin/users",
        json!({ "email": "not-an-email", "password": "longenough", "roles": [] }),
        &[("authorization", &format!("Bearer {}", token))],
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["field"], "email");
    Ok(())
}
