//! 数据模型模块
//! 认证相关模型（用户、角色、令牌）与菜单管理模型

pub mod auth;
pub mod common;
pub mod menu;
pub mod role;
pub mod user;
