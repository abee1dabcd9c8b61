mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn root_returns_success_envelope() -> Result<()> {
    let (app, _state) = common::test_app();

    let response = common::get(app, "/", None).await?;
    assert_eq!(response.0, StatusCode::OK);

    let body = response.1;
    assert_eq!(body["success"], true);
    assert!(body.get("data").is_some());
    assert!(body.get("error").is_none());
    assert!(body["meta"]["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn whoami_without_token_is_unauthorized() -> Result<()> {
    let (app, _state) = common::test_app();

    let (status, body) = common::get(app, "/api/auth/whoami", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert!(body.get("data").is_none());
    Ok(())
}

#[tokio::test]
async fn whoami_with_access_token_returns_principal() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("0b7e4a22-0000-0000-0000-000000000001", "editor@beacon.example", &["EDITOR".to_string()])
        .unwrap();

    let (status, body) = common::get(app, "/api/auth/whoami", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "editor@beacon.example");
    assert_eq!(body["data"]["roles"], json!(["EDITOR"]));
    assert!(body.get("error").is_none());
    Ok(())
}

#[tokio::test]
async fn whoami_rejects_refresh_token() -> Result<()> {
    // A refresh token must never authenticate a protected route
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_refresh_token("user-1", "editor@beacon.example", &["EDITOR".to_string()])
        .unwrap();

    let (status, body) = common::get(app, "/api/auth/whoami", Some(&token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn whoami_rejects_tampered_token() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "editor@beacon.example", &[])
        .unwrap();
    let tampered = format!("{}x", token);

    let (status, _body) = common::get(app, "/api/auth/whoami", Some(&tampered)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_route_requires_admin_role() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "editor@beacon.example", &["EDITOR".to_string()])
        .unwrap();

    let (status, body) = common::get(app, "/api/admin/health", Some(&token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn admin_route_with_admin_role_passes_authorization() -> Result<()> {
    let (app, state) = common::test_app();
    let token = state
        .tokens
        .issue_access_token("user-1", "admin@beacon.example", &["ADMIN".to_string()])
        .unwrap();

    // Authorization passes; the result then depends on database
    // availability, which this test does not assume.
    let (status, body) = common::get(app, "/api/admin/health", Some(&token)).await?;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
    assert_ne!(status, StatusCode::FORBIDDEN);
    if status == StatusCode::OK {
        assert_eq!(body["success"], true);
    } else {
        assert_eq!(body["success"], false);
        assert!(body.get("error").is_some());
    }
    Ok(())
}

#[tokio::test]
async fn refresh_with_garbage_token_is_unauthorized() -> Result<()> {
    let (app, _state) = common::test_app();

    let (status, body) = common::post_json(
        app,
        "/auth/refresh",
        json!({ "refresh_token": "not-a-token" }),
        &[],
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn malformed_json_body_still_gets_envelope() -> Result<()> {
    let (app, _state) = common::test_app();

    let (status, body) = common::post_raw(
        app,
        "/auth/refresh",
        "{not json",
        Some("application/json"),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn missing_content_type_is_unsupported_media_type() -> Result<()> {
    let (app, _state) = common::test_app();

    let (status, body) = common::post_raw(app, "/auth/refresh", "{}", None).await?;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    Ok(())
}
