use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub idle_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub ssl: bool,
    /// When false, TLS is still used but the server certificate is not
    /// verified (self-signed database hosts). Escape hatch, not a default.
    pub ssl_reject_unauthorized: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub auth_rate_limit_requests: u32,
    pub auth_rate_limit_window_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Environment-specific defaults first, individual env vars override
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_IDLE_TIMEOUT_SECS") {
            self.database.idle_timeout_secs = v.parse().unwrap_or(self.database.idle_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_SSL") {
            self.database.ssl = v.parse().unwrap_or(self.database.ssl);
        }
        if let Ok(v) = env::var("DATABASE_SSL_REJECT_UNAUTHORIZED") {
            self.database.ssl_reject_unauthorized =
                v.parse().unwrap_or(self.database.ssl_reject_unauthorized);
        }
        if let Ok(v) = env::var("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms =
                v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // Security overrides
        if let Ok(v) = env::var("ACCESS_TOKEN_SECRET") {
            self.security.access_token_secret = v;
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_SECRET") {
            self.security.refresh_token_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_TTL_SECS") {
            self.security.access_token_ttl_secs =
                v.parse().unwrap_or(self.security.access_token_ttl_secs);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_TTL_SECS") {
            self.security.refresh_token_ttl_secs =
                v.parse().unwrap_or(self.security.refresh_token_ttl_secs);
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.audience = v;
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("AUTH_RATE_LIMIT_REQUESTS") {
            self.api.auth_rate_limit_requests =
                v.parse().unwrap_or(self.api.auth_rate_limit_requests);
        }
        if let Ok(v) = env::var("AUTH_RATE_LIMIT_WINDOW_SECS") {
            self.api.auth_rate_limit_window_secs =
                v.parse().unwrap_or(self.api.auth_rate_limit_window_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 5,
                idle_timeout_secs: 30,
                connect_timeout_secs: 10,
                ssl: false,
                ssl_reject_unauthorized: true,
                slow_query_threshold_ms: 1000,
            },
            security: SecurityConfig {
                access_token_secret: "dev-access-secret".to_string(),
                refresh_token_secret: "dev-refresh-secret".to_string(),
                access_token_ttl_secs: 15 * 60,
                refresh_token_ttl_secs: 7 * 24 * 60 * 60,
                issuer: "beacon-api".to_string(),
                audience: "beacon-site".to_string(),
            },
            api: ApiConfig {
                port: 3000,
                auth_rate_limit_requests: 5,
                auth_rate_limit_window_secs: 15 * 60,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 5,
                idle_timeout_secs: 30,
                connect_timeout_secs: 10,
                ssl: true,
                ssl_reject_unauthorized: true,
                slow_query_threshold_ms: 1000,
            },
            security: SecurityConfig {
                // Secrets have no production default; startup fails without them
                access_token_secret: String::new(),
                refresh_token_secret: String::new(),
                access_token_ttl_secs: 15 * 60,
                refresh_token_ttl_secs: 7 * 24 * 60 * 60,
                issuer: "beacon-api".to_string(),
                audience: "beacon-site".to_string(),
            },
            api: ApiConfig {
                port: 3000,
                auth_rate_limit_requests: 5,
                auth_rate_limit_window_secs: 15 * 60,
            },
        }
    }
}
