//! Menu domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Menu entity (table `tb_menus`)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Menu {
    pub menu_id: String,
    pub menu_name: String,
    pub price: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub use_yn: String,

    // 审计字段
    pub sys_insert_dtm: Option<DateTime<Utc>>,
    pub sys_insert_user_id: Option<String>,
    pub sys_update_dtm: Option<DateTime<Utc>>,
    pub sys_update_user_id: Option<String>,
}

/// Create / update menu request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuRequest {
    /// 更新时以路径参数为准，可省略
    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub menu_id: String,
    #[validate(length(min = 1, max = 100))]
    pub menu_name: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_use_yn"))]
    pub use_yn: Option<String>,
}

fn validate_use_yn(value: &str) -> Result<(), ValidationError> {
    match value {
        "Y" | "N" => Ok(()),
        _ => Err(ValidationError::new("use_yn").with_message("useYn must be 'Y' or 'N'".into())),
    }
}

impl MenuRequest {
    /// Request -> Entity, `use_yn` defaults to "Y"
    pub fn into_entity(self, actor: &str) -> Menu {
        let now = Utc::now();
        Menu {
            menu_id: self.menu_id,
            menu_name: self.menu_name,
            price: self.price,
            category: self.category,
            description: self.description,
            use_yn: self.use_yn.unwrap_or_else(|| "Y".to_string()),
            sys_insert_dtm: Some(now),
            sys_insert_user_id: Some(actor.to_string()),
            sys_update_dtm: Some(now),
            sys_update_user_id: Some(actor.to_string()),
        }
    }
}

/// Menu response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub menu_id: String,
    pub menu_name: String,
    pub price: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub use_yn: String,
    pub sys_insert_dtm: Option<DateTime<Utc>>,
    pub sys_insert_user_id: Option<String>,
    pub sys_update_dtm: Option<DateTime<Utc>>,
    pub sys_update_user_id: Option<String>,
}

impl From<Menu> for MenuResponse {
    fn from(menu: Menu) -> Self {
        Self {
            menu_id: menu.menu_id,
            menu_name: menu.menu_name,
            price: menu.price,
            category: menu.category,
            description: menu.description,
            use_yn: menu.use_yn,
            sys_insert_dtm: menu.sys_insert_dtm,
            sys_insert_user_id: menu.sys_insert_user_id,
            sys_update_dtm: menu.sys_update_dtm,
            sys_update_user_id: menu.sys_update_user_id,
        }
    }
}

/// Menu list query (`?page=1&size=10&menuName=..&category=..&useYn=..&sort=price,desc`)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub menu_name: Option<String>,
    pub category: Option<String>,
    pub use_yn: Option<String>,
    pub sort: Option<String>,
}

/// Search filters passed down to the repository
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MenuFilters {
    pub menu_name: Option<String>,
    pub category: Option<String>,
    pub use_yn: Option<String>,
}

impl MenuFilters {
    /// Blank filter values are treated as absent
    pub fn from_query(query: &MenuListQuery) -> Self {
        fn non_blank(v: &Option<String>) -> Option<String> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            menu_name: non_blank(&query.menu_name),
            category: non_blank(&query.category),
            use_yn: non_blank(&query.use_yn),
        }
    }
}
