use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

use crate::auth::tokens::{TokenClaims, TokenService};

/// Verified identity reconstructed from an access token on every request.
/// The roles embedded in a signed token are authoritative for its
/// lifetime; they are not re-fetched from storage during verification.
#[derive(Debug, Clone)]
pub struct Principal {
    pub subject_id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject_id: claims.sub,
            email: claims.email,
            roles: claims.roles,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }
}

/// Role strings embedded in token claims.
pub mod roles {
    pub const ADMIN: &str = "ADMIN";
    pub const EDITOR: &str = "EDITOR";
    pub const REVIEWER: &str = "REVIEWER";
    pub const VIEWER: &str = "VIEWER";
}

/// Returns the token following the case-sensitive `Bearer ` prefix, or
/// None when the header is absent or malformed. Absence is a normal
/// outcome, never an error.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.trim().is_empty() {
        return None;
    }
    Some(token)
}

/// Resolve the request's Principal, or None if there is no verifiable
/// bearer token. Verification failures degrade to anonymous on purpose:
/// "missing" and "bad" tokens are indistinguishable to callers, who only
/// need a yes/no answer. The failure mode is logged here instead.
pub fn resolve_principal(tokens: &TokenService, headers: &HeaderMap) -> Option<Principal> {
    let token = extract_bearer_token(headers)?;
    match tokens.verify_access_token(token) {
        Ok(claims) => Some(Principal::from(claims)),
        Err(err) => {
            tracing::warn!("discarding unverifiable bearer token: {}", err);
            None
        }
    }
}
