// /api/admin/* - ADMIN-only operations
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{roles, Principal};
use crate::database::models::user::{hash_password, normalize_email, User};
use crate::database::{DatabaseError, HealthReport};
use crate::error::ApiError;
use crate::middleware::{require_role, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/admin/health - detailed health report
pub async fn health_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<HealthReport> {
    require_role(&principal, roles::ADMIN)?;

    let report = state.db.health_check().await?;
    Ok(ApiResponse::success(report))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub roles: Vec<String>,
}

const KNOWN_ROLES: &[&str] = &[roles::ADMIN, roles::EDITOR, roles::REVIEWER, roles::VIEWER];

/// POST /api/admin/users - create an editor/admin account
pub async fn user_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    require_role(&principal, roles::ADMIN)?;
    let Json(body) = body?;

    let email = normalize_email(&body.email);
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation_failed(
            "A valid email address is required",
            Some(json!({ "field": "email" })),
        ));
    }
    if body.password.len() < 8 {
        return Err(ApiError::validation_failed(
            "Password must be at least 8 characters",
            Some(json!({ "field": "password" })),
        ));
    }
    let unknown: Vec<&String> = body
        .roles
        .iter()
        .filter(|r| !KNOWN_ROLES.contains(&r.as_str()))
        .collect();
    if !unknown.is_empty() {
        return Err(ApiError::validation_failed(
            "Unknown role",
            Some(json!({ "field": "roles", "unknown": unknown })),
        ));
    }

    let password_hash = hash_password(&body.password);
    let user_roles = body.roles.clone();

    // Uniqueness check and insert happen atomically; a failure after the
    // check leaves nothing behind.
    let user: User = state
        .db
        .with_transaction(|tx| {
            let email = email.clone();
            let password_hash = password_hash.clone();
            let user_roles = user_roles.clone();
            Box::pin(async move {
                let existing = sqlx::query("SELECT id FROM users WHERE email = $1")
                    .bind(&email)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(DatabaseError::from)?;
                if existing.is_some() {
                    return Err(ApiError::conflict("An account with this email already exists"));
                }

                let user: User = sqlx::query_as(
                    "INSERT INTO users (id, email, password_hash, roles, active, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, true, now(), now()) \
                     RETURNING id, email, password_hash, roles, active, created_at, updated_at",
                )
                .bind(Uuid::new_v4())
                .bind(&email)
                .bind(&password_hash)
                .bind(&user_roles)
                .fetch_one(&mut **tx)
                .await
                .map_err(DatabaseError::from)?;

                Ok(user)
            })
        })
        .await?;

    tracing::info!("created account {}", user.email);
    Ok(ApiResponse::created(user))
}
