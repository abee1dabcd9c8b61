// GET /api/auth/whoami - echo the authenticated principal
use axum::Extension;
use serde::Serialize;

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub subject_id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub issued_at: String,
    pub expires_at: String,
}

pub async fn whoami_get(Extension(principal): Extension<Principal>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        subject_id: principal.subject_id,
        email: principal.email,
        roles: principal.roles,
        issued_at: principal.issued_at.to_rfc3339(),
        expires_at: principal.expires_at.to_rfc3339(),
    }))
}
