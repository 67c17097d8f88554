//! JWT token generation and validation
//! Implements access token + refresh token pattern

use crate::{config::AppConfig, error::AppError, models::role::Role};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Token type carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User roles (empty for refresh tokens)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,

    /// Token type (access or refresh)
    pub token_type: TokenType,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Why a token was rejected. Only used for logging; callers see a single
/// "invalid token" outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("bad signature")]
    BadSignature,
    #[error("wrong token type")]
    WrongTokenType,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.jwt_secret.expose_secret(),
            config.security.access_token_exp_secs,
            config.security.refresh_token_exp_secs,
        )
    }

    pub fn new(
        secret: &str,
        access_token_exp_secs: u64,
        refresh_token_exp_secs: u64,
    ) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_exp_secs,
            refresh_token_exp_secs,
        })
    }

    /// Access token lifetime in milliseconds
    pub fn expiration_ms(&self) -> u64 {
        self.access_token_exp_secs.saturating_mul(1000)
    }

    fn sign(
        &self,
        user_id: &str,
        roles: Vec<Role>,
        token_type: TokenType,
        lifetime_secs: u64,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(lifetime_secs).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: user_id.to_string(),
            roles,
            token_type,
            iat: now,
            exp: now.saturating_add(lifetime),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode {:?} token: {:?}", token_type, e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }
}

/// Issues and checks signed, expiring tokens.
///
/// Only `decode` and the two issue methods are required; the typed checks
/// and extractors are derived from `decode`.
pub trait TokenProvider: Send + Sync {
    /// Issue an access token carrying the subject and its roles.
    /// Returns the token and its lifetime in milliseconds.
    fn issue_access_token(
        &self,
        user_id: &str,
        roles: &HashSet<Role>,
    ) -> Result<(String, u64), AppError>;

    /// Issue a refresh token carrying the subject only
    fn issue_refresh_token(&self, user_id: &str) -> Result<String, AppError>;

    /// Decode a token of any type, checking signature and `iat <= now < exp`
    fn decode(&self, token: &str) -> Result<Claims, TokenError>;

    /// Decode a token and require the given type
    fn decode_as(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;

        if claims.token_type != expected {
            tracing::debug!(
                "Token type mismatch: expected {:?}, got {:?}",
                expected,
                claims.token_type
            );
            return Err(TokenError::WrongTokenType);
        }

        Ok(claims)
    }

    /// True iff the signature checks out and the token is inside its
    /// validity window. Never panics on garbage input.
    fn validate(&self, token: &str) -> bool {
        match self.decode(token) {
            Ok(_) => true,
            Err(reason) => {
                tracing::debug!(reason = %reason, "Token validation failed");
                false
            }
        }
    }

    /// Subject of a valid token
    fn extract_user_id(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Roles of a valid token (empty for refresh tokens)
    fn extract_roles(&self, token: &str) -> Result<HashSet<Role>, TokenError> {
        self.decode(token)
            .map(|claims| claims.roles.into_iter().collect())
    }
}

impl TokenProvider for JwtService {
    fn issue_access_token(
        &self,
        user_id: &str,
        roles: &HashSet<Role>,
    ) -> Result<(String, u64), AppError> {
        let mut roles: Vec<Role> = roles.iter().copied().collect();
        roles.sort();

        let token = self.sign(user_id, roles, TokenType::Access, self.access_token_exp_secs)?;
        Ok((token, self.expiration_ms()))
    }

    fn issue_refresh_token(&self, user_id: &str) -> Result<String, AppError> {
        self.sign(user_id, Vec::new(), TokenType::Refresh, self.refresh_token_exp_secs)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 过期时间自行判断，不留宽限
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?
            .claims;

        let now = Utc::now().timestamp();
        if now >= claims.exp || claims.iat > now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
