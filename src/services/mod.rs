//! Business logic services layer

pub mod auth_service;
pub mod menu_service;
pub mod sort;

pub use auth_service::AuthService;
pub use menu_service::MenuService;
pub use sort::SortValidator;
