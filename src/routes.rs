use axum::middleware::from_fn_with_state;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::HealthReport;
use crate::handlers;
use crate::middleware::{auth_middleware, auth_rate_limit_middleware, ApiResponse, ApiResult};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/auth/login",
            post(handlers::auth::login_post).layer(from_fn_with_state(
                state.clone(),
                auth_rate_limit_middleware,
            )),
        )
        .route("/auth/refresh", post(handlers::auth::refresh_post));

    let protected = Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami_get))
        .route("/api/admin/health", get(handlers::admin::health_get))
        .route("/api/admin/users", post(handlers::admin::user_post))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public)
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Beacon API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Backend core for the Beacon corporate site",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "login": "/auth/login (public, rate limited)",
            "refresh": "/auth/refresh (public)",
            "whoami": "/api/auth/whoami (protected)",
            "admin_health": "/api/admin/health (protected, ADMIN)",
            "admin_users": "/api/admin/users (protected, ADMIN)",
        }
    })))
}

async fn health(State(state): State<AppState>) -> ApiResult<HealthReport> {
    let report = state.db.health_check().await?;
    Ok(ApiResponse::success(report))
}
