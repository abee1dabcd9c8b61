// POST /auth/login - authenticate an admin/editor and issue a token pair
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::user::{normalize_email, verify_password, User};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(body) = body?;

    // Accounts store the canonical form, so look it up the same way
    let email = normalize_email(&body.email);
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::validation_failed(
            "Email and password are required",
            None,
        ));
    }

    let pool = state.db.get_pool().await?;
    let user: Option<User> = sqlx::query_as(
        "SELECT id, email, password_hash, roles, active, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&pool)
    .await
    .map_err(DatabaseError::from)?;

    // Same message for unknown email and wrong password
    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;
    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }
    if !user.active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    let pair = state
        .tokens
        .issue_token_pair(&user.id.to_string(), &user.email, &user.roles)?;

    tracing::info!("login for {}", user.email);

    Ok(ApiResponse::success(SessionResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
        user: SessionUser {
            id: user.id,
            email: user.email,
            roles: user.roles,
        },
    }))
}
