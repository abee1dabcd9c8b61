use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Claim set carried inside every signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Opaque identifier of the user/admin record
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Access + refresh token minted together from identical claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds, for client-side refresh scheduling
    pub expires_in: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token signature, issuer or audience mismatch")]
    Invalid,
    #[error("token malformed")]
    Malformed,
    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Access,
    Refresh,
}

/// Mints and verifies self-contained signed credentials. Access and
/// refresh tokens are signed with different secrets, so a token of one
/// kind can never verify as the other.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.access_token_secret.is_empty() || security.refresh_token_secret.is_empty() {
            return Err(TokenError::Signing(
                "token secrets are not configured".to_string(),
            ));
        }

        Ok(Self {
            access_encoding: EncodingKey::from_secret(security.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(security.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(security.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(security.refresh_token_secret.as_bytes()),
            access_ttl_secs: security.access_token_ttl_secs,
            refresh_ttl_secs: security.refresh_token_ttl_secs,
            issuer: security.issuer.clone(),
            audience: security.audience.clone(),
        })
    }

    pub fn issue_access_token(
        &self,
        subject_id: &str,
        email: &str,
        roles: &[String],
    ) -> Result<String, TokenError> {
        self.issue(subject_id, email, roles, TokenKind::Access)
    }

    pub fn issue_refresh_token(
        &self,
        subject_id: &str,
        email: &str,
        roles: &[String],
    ) -> Result<String, TokenError> {
        self.issue(subject_id, email, roles, TokenKind::Refresh)
    }

    /// Both tokens of the pair are minted from the same claims; each
    /// expiry is computed independently from the moment of this call.
    pub fn issue_token_pair(
        &self,
        subject_id: &str,
        email: &str,
        roles: &[String],
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject_id, email, roles)?,
            refresh_token: self.issue_refresh_token(subject_id, email, roles)?,
            expires_in: self.access_ttl_secs,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }

    fn issue(
        &self,
        subject_id: &str,
        email: &str,
        roles: &[String],
        kind: TokenKind,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + ttl,
        };
        self.sign(&claims, kind)
    }

    fn sign(&self, claims: &TokenClaims, kind: TokenKind) -> Result<String, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        };
        encode(&Header::default(), claims, key).map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        // Strict expiry: no leeway, a token is valid strictly before exp
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<TokenClaims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::ImmatureSignature => TokenError::Invalid,
            _ => TokenError::Malformed,
        })?;

        Ok(data.claims)
    }
}
