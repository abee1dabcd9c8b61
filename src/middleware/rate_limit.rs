use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// Throttles credential endpoints per `route:client_ip`. Runs before
/// authentication so brute-force attempts are cut off without touching
/// the token service or the database.
pub async fn auth_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identifier = format!(
        "{}:{}",
        request.uri().path(),
        client_ip(request.headers())
    );

    let decision = state.limiter.check(
        &identifier,
        state.config.api.auth_rate_limit_requests,
        state.config.api.auth_rate_limit_window_secs * 1000,
    );

    if !decision.allowed {
        return Err(ApiError::rate_limited(
            "Too many requests, please try again later",
            Some(json!({ "reset_at_ms": decision.reset_at_ms })),
        ));
    }

    Ok(next.run(request).await)
}

/// Best-effort client address for limiter keys. Behind the site's proxy
/// the first X-Forwarded-For entry is the real client.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
