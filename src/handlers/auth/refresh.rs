// POST /auth/refresh - exchange a refresh token for a new token pair
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use super::login::{SessionResponse, SessionUser};
use crate::database::models::User;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_post(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(body) = body?;

    let claims = state
        .tokens
        .verify_refresh_token(&body.refresh_token)
        .map_err(|err| {
            tracing::warn!("refresh rejected: {}", err);
            ApiError::unauthorized("Invalid or expired refresh token")
        })?;

    let subject_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

    // Minting new credentials is the moment freshness matters: re-check
    // the account and pick up its current roles.
    let pool = state.db.get_pool().await?;
    let user: Option<User> = sqlx::query_as(
        "SELECT id, email, password_hash, roles, active, created_at, updated_at \
         FROM users WHERE id = $1",
    )
    .bind(subject_id)
    .fetch_optional(&pool)
    .await
    .map_err(DatabaseError::from)?;

    let user = user.ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;
    if !user.active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    let pair = state
        .tokens
        .issue_token_pair(&user.id.to_string(), &user.email, &user.roles)?;

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
