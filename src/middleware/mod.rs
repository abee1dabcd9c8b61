pub mod auth;
pub mod rate_limit;
pub mod response;

pub use auth::{auth_middleware, require_role};
pub use rate_limit::auth_rate_limit_middleware;
pub use response::{ApiResponse, ApiResult};
