//! 排序参数校验
//! 只允许白名单中的字段排序，并翻译为数据库列名

use crate::{
    error::AppError,
    models::common::{SortDirection, SortOrder},
};

/// 排序字段白名单：(请求字段名, 数据库列名)
pub struct SortValidator {
    allowed: &'static [(&'static str, &'static str)],
}

/// 菜单列表可排序字段
pub const MENU_SORT_FIELDS: &[(&str, &str)] = &[
    ("menuId", "menu_id"),
    ("menuName", "menu_name"),
    ("price", "price"),
    ("category", "category"),
    ("useYn", "use_yn"),
    ("sysInsertDtm", "sys_insert_dtm"),
    ("sysUpdateDtm", "sys_update_dtm"),
];

impl SortValidator {
    pub const fn new(allowed: &'static [(&'static str, &'static str)]) -> Self {
        Self { allowed }
    }

    pub const fn menus() -> Self {
        Self::new(MENU_SORT_FIELDS)
    }

    /// 解析 `"<field>,<asc|desc>"`
    ///
    /// 末尾的空段会被丢弃，之后段数不为 2 时忽略排序（返回 None），
    /// 字段不在白名单或方向非法时返回校验错误。
    pub fn parse(&self, sort: Option<&str>) -> Result<Option<SortOrder>, AppError> {
        let Some(raw) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let mut parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        let [field, direction] = parts.as_slice() else {
            tracing::debug!(sort = %raw, "Ignoring malformed sort parameter");
            return Ok(None);
        };

        let column = self
            .allowed
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| AppError::Validation(format!("Invalid sort field: {}", field)))?;

        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => {
                return Err(AppError::Validation(format!(
                    "Invalid sort direction: {}",
                    direction
                )))
            }
        };

        Ok(Some(SortOrder { column, direction }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_field_is_translated() {
        let order = SortValidator::menus()
            .parse(Some("sysInsertDtm,DESC"))
            .unwrap()
            .unwrap();
        assert_eq!(order.column, "sys_insert_dtm");
        assert_eq!(order.direction, SortDirection::Desc);

        let order = SortValidator::menus().parse(Some("price,asc")).unwrap().unwrap();
        assert_eq!(order.to_sql(), "price ASC");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SortValidator::menus()
            .parse(Some("user_pwd,asc"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // 列名本身也不被接受，只认请求字段名
        assert!(SortValidator::menus().parse(Some("menu_name,asc")).is_err());
        assert!(SortValidator::menus()
            .parse(Some("price; DROP TABLE tb_menus,asc"))
            .is_err());
    }

    #[test]
    fn test_bad_direction_rejected() {
        assert!(SortValidator::menus().parse(Some("price,sideways")).is_err());
    }

    #[test]
    fn test_malformed_or_empty_sort_ignored() {
        let validator = SortValidator::menus();
        assert_eq!(validator.parse(None).unwrap(), None);
        assert_eq!(validator.parse(Some("")).unwrap(), None);
        assert_eq!(validator.parse(Some("price")).unwrap(), None);
        assert_eq!(validator.parse(Some("price,asc,extra")).unwrap(), None);
    }

    #[test]
    fn test_trailing_empty_segments_dropped() {
        let validator = SortValidator::menus();
        assert_eq!(validator.parse(Some("price,")).unwrap(), None);
        assert_eq!(validator.parse(Some("price,,")).unwrap(), None);

        let order = validator.parse(Some("price,asc,")).unwrap().unwrap();
        assert_eq!(order.to_sql(), "price ASC");

        // 只丢弃末尾的空段
        assert!(validator.parse(Some(",asc")).is_err());
    }
}
