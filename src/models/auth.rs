//! Authentication-related models

use super::{role::Role, user::UserInfoResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "userId must be 1 to 50 characters"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 128, message = "userPwd must be 1 to 128 characters"))]
    pub user_pwd: String,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Token validation request (used when no Authorization header is sent)
#[derive(Debug, Default, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: Option<String>,
}

/// Login / refresh response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in milliseconds
    pub expires_in: u64,
    pub user: UserInfoResponse,
}

/// Outcome of validating an access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidation {
    Valid { user_id: String, roles: HashSet<Role> },
    Invalid { reason: String },
}

impl TokenValidation {
    pub fn invalid(reason: impl Into<String>) -> Self {
        TokenValidation::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TokenValidation::Valid { .. })
    }
}

/// Token validation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<TokenValidation> for TokenValidationResponse {
    fn from(validation: TokenValidation) -> Self {
        match validation {
            TokenValidation::Valid { user_id, roles } => {
                let mut roles: Vec<Role> = roles.into_iter().collect();
                roles.sort();
                Self {
                    valid: true,
                    user_id: Some(user_id),
                    roles,
                    message: None,
                }
            }
            TokenValidation::Invalid { reason } => Self {
                valid: false,
                user_id: None,
                roles: Vec::new(),
                message: Some(reason),
            },
        }
    }
}
