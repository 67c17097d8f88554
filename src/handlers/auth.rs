//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::{extract_token, AuthContext},
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::{auth::*, common::ApiResponse},
};
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{Extensions, HeaderMap},
    response::IntoResponse,
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use validator::Validate;

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = get_client_ip(&headers, peer, state.config.security.trust_proxy);
    let user_agent = headers.get("user-agent").and_then(|v| v.to_str().ok());

    let response = state
        .auth_service
        .login(&req.user_id, &req.user_pwd, &client_ip, user_agent)
        .await?;

    Ok(Json(ApiResponse::success(response)))
}

/// 刷新令牌
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// 校验令牌，优先使用 Authorization 头，其次读取请求体中的 token
pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let token = extract_token(&headers).ok().or_else(|| {
        serde_json::from_slice::<ValidateTokenRequest>(&body)
            .ok()
            .and_then(|req| req.token)
            .filter(|t| !t.trim().is_empty())
    });

    let validation = match token {
        Some(token) => state.auth_service.validate_token(&token),
        None => TokenValidation::invalid("Missing token"),
    };

    Ok(Json(ApiResponse::success(TokenValidationResponse::from(
        validation,
    ))))
}

/// 登出（尽力而为，任何情况下都返回成功）
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    match extract_token(&headers) {
        Ok(token) => state.auth_service.logout(&token),
        Err(_) => tracing::debug!("Logout without bearer token"),
    }

    Ok(Json(ApiResponse::ok()))
}

/// 获取当前用户信息
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.current_user(&auth_context.user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}
