//! 认证服务：登录、令牌刷新、令牌校验、登出
//! 无状态，不保存会话也不维护令牌黑名单

use crate::{
    auth::{
        jwt::{TokenProvider, TokenType},
        password::PasswordVerifier,
    },
    error::AppError,
    models::{
        auth::{LoginResponse, TokenValidation},
        user::{CredentialRecord, UserInfoResponse},
    },
    repository::user_repo::CredentialStore,
};
use std::sync::Arc;

/// 未知用户与密码错误共用同一条消息，避免枚举用户
pub const INVALID_CREDENTIALS: &str = "Invalid User ID or password";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_TOKEN: &str = "Invalid token";

/// 未知用户时用于校验的哈希，参数与 `PasswordHasher::new()` 一致，不对应任何密码
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=65536,t=3,p=4$ZHVtbXlzYWx0ZHVtbXlzYQ$cTZ37aCxYhiyvLbYMi51TywNFbP6im4UyUP6kaT2FuE";

pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    password_verifier: Arc<dyn PasswordVerifier>,
    token_provider: Arc<dyn TokenProvider>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        password_verifier: Arc<dyn PasswordVerifier>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            credentials,
            password_verifier,
            token_provider,
        }
    }

    /// 用户登录
    pub async fn login(
        &self,
        user_id: &str,
        password: &str,
        client_ip: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginResponse, AppError> {
        let record = match self.credentials.find_by_user_id(user_id).await? {
            Some(record) => record,
            None => {
                // 与真实校验同样耗时，响应时间不暴露用户是否存在
                let _ = self.password_verifier.matches(password, DUMMY_PASSWORD_HASH);
                tracing::warn!(user_id = %user_id, client_ip = %client_ip, "Login failed: unknown user");
                return Err(AppError::authentication(INVALID_CREDENTIALS));
            }
        };

        if !self.password_verifier.matches(password, &record.password_hash) {
            tracing::warn!(user_id = %user_id, client_ip = %client_ip, "Login failed: bad password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let response = self.issue_tokens(&record)?;

        tracing::info!(
            user_id = %record.user_id,
            roles = ?response.user.roles,
            client_ip = %client_ip,
            user_agent = user_agent.unwrap_or("-"),
            "User logged in"
        );

        Ok(response)
    }

    /// 刷新令牌，角色从凭据存储重新读取
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResponse, AppError> {
        let claims = self
            .token_provider
            .decode_as(refresh_token, TokenType::Refresh)
            .map_err(|reason| {
                tracing::warn!(reason = %reason, "Refresh rejected");
                AppError::invalid_token(INVALID_REFRESH_TOKEN)
            })?;

        let record = self
            .credentials
            .find_by_user_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.sub, "Refresh rejected: user no longer exists");
                AppError::UserNotFound(USER_NOT_FOUND.to_string())
            })?;

        let response = self.issue_tokens(&record)?;
        tracing::info!(user_id = %record.user_id, "Tokens refreshed");

        Ok(response)
    }

    /// 校验访问令牌，任何输入都返回结果而不是错误
    pub fn validate_token(&self, token: &str) -> TokenValidation {
        match self.token_provider.decode_as(token, TokenType::Access) {
            Ok(claims) => TokenValidation::Valid {
                user_id: claims.sub,
                roles: claims.roles.into_iter().collect(),
            },
            Err(reason) => {
                tracing::debug!(reason = %reason, "Token validation failed");
                TokenValidation::invalid(INVALID_TOKEN)
            }
        }
    }

    /// 登出：没有撤销存储，只记录日志，从不返回错误
    pub fn logout(&self, token: &str) {
        match self.token_provider.decode(token) {
            Ok(claims) => {
                tracing::info!(user_id = %claims.sub, "User logged out");
            }
            Err(reason) => {
                tracing::debug!(reason = %reason, "Logout with unusable token ignored");
            }
        }
    }

    /// 当前登录用户信息
    pub async fn current_user(&self, user_id: &str) -> Result<UserInfoResponse, AppError> {
        self.credentials
            .find_by_user_id(user_id)
            .await?
            .map(|record| UserInfoResponse::from(&record))
            .ok_or_else(|| AppError::UserNotFound(USER_NOT_FOUND.to_string()))
    }

    fn issue_tokens(&self, record: &CredentialRecord) -> Result<LoginResponse, AppError> {
        let (token, expires_in) = self
            .token_provider
            .issue_access_token(&record.user_id, &record.roles)?;
        let refresh_token = self.token_provider.issue_refresh_token(&record.user_id)?;

        Ok(LoginResponse {
            token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: UserInfoResponse::from(record),
        })
    }
}
