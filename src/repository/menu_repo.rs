//! Menu repository (数据库访问层)
//! 写操作全部在显式事务中执行

use super::base::CrudRepository;
use crate::{
    db,
    error::AppError,
    models::{
        common::SortOrder,
        menu::{Menu, MenuFilters},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;

/// 默认排序：最新创建在前
const DEFAULT_ORDER: &str = "sys_insert_dtm DESC, menu_id";

/// 菜单存储接口：基础增删改查加分页检索
#[async_trait]
pub trait MenuStore: CrudRepository<Menu, str> {
    async fn search(
        &self,
        filters: &MenuFilters,
        sort: Option<SortOrder>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Menu>, AppError>;

    async fn count(&self, filters: &MenuFilters) -> Result<i64, AppError>;
}

pub struct MenuRepository {
    db: PgPool,
}

impl MenuRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// 根据过滤条件生成 WHERE 子句及按顺序绑定的参数
fn where_clause(filters: &MenuFilters) -> (String, Vec<String>) {
    let mut clause = String::from(" WHERE 1=1");
    let mut binds = Vec::new();

    if let Some(name) = &filters.menu_name {
        binds.push(format!("%{}%", name));
        clause.push_str(&format!(" AND menu_name ILIKE ${}", binds.len()));
    }
    if let Some(category) = &filters.category {
        binds.push(format!("%{}%", category));
        clause.push_str(&format!(" AND category ILIKE ${}", binds.len()));
    }
    if let Some(use_yn) = &filters.use_yn {
        binds.push(use_yn.clone());
        clause.push_str(&format!(" AND use_yn = ${}", binds.len()));
    }

    (clause, binds)
}

/// 主键冲突映射为业务错误
fn map_insert_error(err: sqlx::Error, menu_id: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::BadRequest(format!("Menu ID already exists: {}", menu_id))
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl CrudRepository<Menu, str> for MenuRepository {
    async fn find_by_id(&self, menu_id: &str) -> Result<Option<Menu>, AppError> {
        let menu = sqlx::query_as::<_, Menu>("SELECT * FROM tb_menus WHERE menu_id = $1")
            .bind(menu_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(menu)
    }

    async fn exists(&self, menu_id: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tb_menus WHERE menu_id = $1)")
                .bind(menu_id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    async fn insert(&self, menu: &Menu) -> Result<Menu, AppError> {
        let menu = menu.clone();

        db::in_transaction(&self.db, move |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Menu>(
                    r#"
                    INSERT INTO tb_menus (
                        menu_id, menu_name, price, category, description, use_yn,
                        sys_insert_dtm, sys_insert_user_id, sys_update_dtm, sys_update_user_id
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7, NOW(), $7)
                    RETURNING *
                    "#,
                )
                .bind(&menu.menu_id)
                .bind(&menu.menu_name)
                .bind(menu.price)
                .bind(&menu.category)
                .bind(&menu.description)
                .bind(&menu.use_yn)
                .bind(&menu.sys_insert_user_id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| map_insert_error(e, &menu.menu_id))
            })
        })
        .await
    }

    async fn update(&self, menu: &Menu) -> Result<Option<Menu>, AppError> {
        let menu = menu.clone();

        db::in_transaction(&self.db, move |conn| {
            Box::pin(async move {
                let updated = sqlx::query_as::<_, Menu>(
                    r#"
                    UPDATE tb_menus
                    SET
                        menu_name = $2,
                        price = $3,
                        category = $4,
                        description = $5,
                        use_yn = $6,
                        sys_update_dtm = NOW(),
                        sys_update_user_id = $7
                    WHERE menu_id = $1
                    RETURNING *
                    "#,
                )
                .bind(&menu.menu_id)
                .bind(&menu.menu_name)
                .bind(menu.price)
                .bind(&menu.category)
                .bind(&menu.description)
                .bind(&menu.use_yn)
                .bind(&menu.sys_update_user_id)
                .fetch_optional(&mut *conn)
                .await?;

                Ok::<_, AppError>(updated)
            })
        })
        .await
    }

    async fn delete(&self, menu_id: &str) -> Result<bool, AppError> {
        let menu_id = menu_id.to_string();

        db::in_transaction(&self.db, move |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM tb_menus WHERE menu_id = $1")
                    .bind(&menu_id)
                    .execute(&mut *conn)
                    .await?;

                Ok::<_, AppError>(result.rows_affected() > 0)
            })
        })
        .await
    }
}

#[async_trait]
impl MenuStore for MenuRepository {
    async fn search(
        &self,
        filters: &MenuFilters,
        sort: Option<SortOrder>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Menu>, AppError> {
        let (clause, binds) = where_clause(filters);
        // 排序列只可能来自白名单，可以直接拼接
        let order = sort.map(|s| s.to_sql()).unwrap_or_else(|| DEFAULT_ORDER.to_string());

        let query = format!(
            "SELECT * FROM tb_menus{} ORDER BY {} LIMIT ${} OFFSET ${}",
            clause,
            order,
            binds.len() + 1,
            binds.len() + 2
        );

        let mut query_builder = sqlx::query_as::<_, Menu>(&query);
        for value in &binds {
            query_builder = query_builder.bind(value);
        }

        let menus = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(menus)
    }

    async fn count(&self, filters: &MenuFilters) -> Result<i64, AppError> {
        let (clause, binds) = where_clause(filters);
        let query = format!("SELECT COUNT(*) FROM tb_menus{}", clause);

        let mut query_builder = sqlx::query_scalar::<_, i64>(&query);
        for value in &binds {
            query_builder = query_builder.bind(value);
        }

        Ok(query_builder.fetch_one(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause_numbering() {
        let filters = MenuFilters {
            menu_name: Some("Latte".to_string()),
            category: None,
            use_yn: Some("Y".to_string()),
        };

        let (clause, binds) = where_clause(&filters);
        assert_eq!(clause, " WHERE 1=1 AND menu_name ILIKE $1 AND use_yn = $2");
        assert_eq!(binds, vec!["%Latte%".to_string(), "Y".to_string()]);
    }

    #[test]
    fn test_where_clause_without_filters() {
        let (clause, binds) = where_clause(&MenuFilters::default());
        assert_eq!(clause, " WHERE 1=1");
        assert!(binds.is_empty());
    }
}
