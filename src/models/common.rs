//! 通用响应模型：统一成功响应外壳与分页结果

use serde::Serialize;

/// 统一成功响应外壳
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "200".to_string(),
            message: "OK".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 无返回数据的成功响应
    pub fn ok() -> Self {
        Self {
            code: "200".to_string(),
            message: "OK".to_string(),
            data: None,
        }
    }
}

/// 分页结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub list: Vec<T>,
    pub total: i64,
    pub page_num: u32,
    pub page_size: u32,
    pub pages: u32,
}

impl<T> PageResponse<T> {
    pub fn new(list: Vec<T>, total: i64, page: &PageRequest) -> Self {
        let size = i64::from(page.size);
        let pages = if total <= 0 { 0 } else { (total + size - 1) / size };

        Self {
            list,
            total,
            page_num: page.page,
            page_size: page.size,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }
}

/// 归一化后的分页参数（page 从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// 缺省或非法的 page 视为 1，size 限制在 1..=max_size
    pub fn new(page: Option<u32>, size: Option<u32>, default_size: u32, max_size: u32) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            size: size.filter(|s| *s > 0).unwrap_or(default_size).min(max_size),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.size)
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// 已通过白名单校验的排序条件，column 为数据库列名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.direction.as_sql())
    }
}
