pub mod guard;
pub mod tokens;

pub use guard::{extract_bearer_token, resolve_principal, roles, Principal};
pub use tokens::{TokenClaims, TokenError, TokenPair, TokenService};
