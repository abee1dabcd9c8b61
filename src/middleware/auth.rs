use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{resolve_principal, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// Authentication middleware for protected routes. Resolves the request's
/// Principal and injects it as an extension; no verifiable credential
/// means 401. Role checks are a separate, per-handler step (403), never
/// collapsed into this one.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = resolve_principal(&state.tokens, request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Authorization step of the protected-route contract: the caller is
/// already authenticated, so a missing role is 403, not 401.
pub fn require_role(principal: &Principal, role: &str) -> Result<(), ApiError> {
    if principal.has_role(role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("Requires {} role", role)))
    }
}
