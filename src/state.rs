use std::sync::Arc;

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::rate_limit::RateLimiter;

/// Process-wide collaborators shared by every in-flight request. Built
/// once at startup and cloned cheaply into handlers; tests construct a
/// fresh state per case instead of sharing process globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub db: Arc<DatabaseManager>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, TokenError> {
        crate::error::set_production_mode(config.environment.is_production());
        let tokens = TokenService::from_config(&config.security)?;
        let db = DatabaseManager::new(config.database.clone(), config.environment);

        Ok(Self {
            tokens: Arc::new(tokens),
            db: Arc::new(db),
            limiter: Arc::new(RateLimiter::new()),
            config: Arc::new(config),
        })
    }
}
