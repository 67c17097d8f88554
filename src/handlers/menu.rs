//! 菜单管理 HTTP 处理器
//! 查询只需登录，增删改需要管理员角色

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{
        common::ApiResponse,
        menu::{MenuListQuery, MenuRequest},
        role::Role,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 分页查询菜单
pub async fn list_menus(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MenuListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.menu_service.list(&query).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// 查询单个菜单
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    Path(menu_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let menu = state.menu_service.get(&menu_id).await?;
    Ok(Json(ApiResponse::success(menu)))
}

/// 创建菜单
pub async fn create_menu(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<MenuRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(Role::Admin)?;

    let menu = state
        .menu_service
        .create(req, &auth_context.user_id)
        .await?;
    Ok(Json(ApiResponse::success(menu)))
}

/// 更新菜单
pub async fn update_menu(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(menu_id): Path<String>,
    Json(req): Json<MenuRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(Role::Admin)?;

    let menu = state
        .menu_service
        .update(&menu_id, req, &auth_context.user_id)
        .await?;
    Ok(Json(ApiResponse::success(menu)))
}

/// 删除菜单
pub async fn delete_menu(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(menu_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(Role::Admin)?;

    state
        .menu_service
        .delete(&menu_id, &auth_context.user_id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
