use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use beacon_api::config::AppConfig;
use beacon_api::routes::app;
use beacon_api::state::AppState;

/// Router plus its state, built fresh per test so nothing leaks between
/// cases. Development config: known token secrets, 5-request auth limit.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::new(AppConfig::development()).expect("test state");
    (app(state.clone()), state)
}

pub async fn get(
    app: Router,
    path: &str,
    bearer: Option<&str>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    send(app, builder.body(Body::empty())?).await
}

pub async fn post_json(
    app: Router,
    path: &str,
    body: Value,
    extra_headers: &[(&str, &str)],
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_string()))?).await
}

pub async fn post_raw(
    app: Router,
    path: &str,
    body: &str,
    content_type: Option<&str>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    send(app, builder.body(Body::from(body.to_string()))?).await
}

async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok((status, body))
}
