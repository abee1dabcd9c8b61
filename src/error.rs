// HTTP API error taxonomy
use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::auth::tokens::TokenError;
use crate::database::manager::DatabaseError;

static PRODUCTION_MODE: OnceLock<bool> = OnceLock::new();

/// Record once, at startup, whether responses should mask internal error
/// messages. Later calls are ignored so the flag cannot drift from the
/// configuration the process booted with.
pub fn set_production_mode(production: bool) {
    let _ = PRODUCTION_MODE.set(production);
}

fn production_mode() -> bool {
    PRODUCTION_MODE.get().copied().unwrap_or(false)
}

/// API error with a fixed status code and machine-readable code string.
/// Every variant renders into the standard failure envelope.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    ValidationFailed {
        message: String,
        details: Option<Value>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 415 Unsupported Media Type
    UnsupportedMediaType(String),

    // 429 Too Many Requests
    RateLimited {
        message: String,
        details: Option<Value>,
    },

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationFailed { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::UnsupportedMediaType(_) => 415,
            ApiError::RateLimited { .. } => 429,
            ApiError::Internal(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::RateLimited { .. } => "RATE_LIMITED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::ValidationFailed { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::UnsupportedMediaType(msg) => msg,
            ApiError::RateLimited { message, .. } => message,
            ApiError::Internal(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    fn details(&self) -> Option<&Value> {
        match self {
            ApiError::ValidationFailed { details, .. } => details.as_ref(),
            ApiError::RateLimited { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Render the failure envelope. Internal error messages are replaced
    /// with a generic phrase in production so internals never leak; every
    /// other kind passes its message through unchanged.
    pub fn to_envelope(&self, production: bool) -> Value {
        let message = match self {
            ApiError::Internal(_) if production => "An unexpected error occurred",
            _ => self.message(),
        };

        let mut error = json!({
            "code": self.error_code(),
            "message": message,
        });
        if let Some(details) = self.details() {
            error["details"] = details.clone();
        }

        json!({
            "success": false,
            "error": error,
            "meta": { "timestamp": Utc::now().to_rfc3339() },
        })
    }
}

// Static constructors, mirroring how handlers raise errors
impl ApiError {
    pub fn validation_failed(message: impl Into<String>, details: Option<Value>) -> Self {
        ApiError::ValidationFailed {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        ApiError::UnsupportedMediaType(message.into())
    }

    pub fn rate_limited(message: impl Into<String>, details: Option<Value>) -> Self {
        ApiError::RateLimited {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Body extraction failures must still produce the envelope; axum's
// default rejections are plain text.
impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        use axum::extract::rejection::JsonRejection;
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::unsupported_media_type("Expected application/json request body")
            }
            other => ApiError::validation_failed(other.body_text(), None),
        }
    }
}

// Token failures surface to clients as a plain 401; the specific failure
// mode is already logged where it happened.
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid | TokenError::Malformed => {
                ApiError::unauthorized("Invalid or expired token")
            }
            TokenError::Signing(msg) => {
                tracing::error!("token signing failed: {}", msg);
                ApiError::internal("Failed to issue credentials")
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Unavailable(msg) => {
                tracing::error!("database unavailable: {}", msg);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but never expose SQL details to clients
                tracing::error!("database error: {}", sqlx_err);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for axum handlers
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_envelope(production_mode()))).into_response()
    }
}
