//! 菜单管理服务：分页查询与增删改

use super::sort::SortValidator;
use crate::{
    config::PaginationConfig,
    error::AppError,
    models::{
        common::{PageRequest, PageResponse},
        menu::{MenuFilters, MenuListQuery, MenuRequest, MenuResponse},
    },
    repository::menu_repo::MenuStore,
};
use validator::Validate;

pub struct MenuService<R: MenuStore> {
    repo: R,
    pagination: PaginationConfig,
    sort_validator: SortValidator,
}

impl<R: MenuStore> MenuService<R> {
    pub fn new(repo: R, pagination: PaginationConfig) -> Self {
        Self {
            repo,
            pagination,
            sort_validator: SortValidator::menus(),
        }
    }

    /// 分页查询菜单
    pub async fn list(&self, query: &MenuListQuery) -> Result<PageResponse<MenuResponse>, AppError> {
        let sort = self.sort_validator.parse(query.sort.as_deref())?;
        let filters = MenuFilters::from_query(query);
        let page = PageRequest::new(
            query.page,
            query.size,
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        );

        let total = self.repo.count(&filters).await?;
        let menus = self
            .repo
            .search(&filters, sort, page.limit(), page.offset())
            .await?;

        let list = menus.into_iter().map(MenuResponse::from).collect();
        Ok(PageResponse::new(list, total, &page))
    }

    /// 查询单个菜单
    pub async fn get(&self, menu_id: &str) -> Result<MenuResponse, AppError> {
        self.repo
            .find_by_id(menu_id)
            .await?
            .map(MenuResponse::from)
            .ok_or_else(|| AppError::not_found(&format!("Menu {}", menu_id)))
    }

    /// 创建菜单
    pub async fn create(&self, req: MenuRequest, actor: &str) -> Result<MenuResponse, AppError> {
        req.validate()?;

        if self.repo.exists(&req.menu_id).await? {
            return Err(AppError::BadRequest(format!(
                "Menu ID already exists: {}",
                req.menu_id
            )));
        }

        let created = self.repo.insert(&req.into_entity(actor)).await?;
        tracing::info!(menu_id = %created.menu_id, actor = %actor, "Menu created");

        Ok(MenuResponse::from(created))
    }

    /// 更新菜单，路径中的 ID 覆盖请求体中的 ID
    pub async fn update(
        &self,
        menu_id: &str,
        mut req: MenuRequest,
        actor: &str,
    ) -> Result<MenuResponse, AppError> {
        req.menu_id = menu_id.to_string();
        req.validate()?;

        let updated = self
            .repo
            .update(&req.into_entity(actor))
            .await?
            .ok_or_else(|| AppError::not_found(&format!("Menu {}", menu_id)))?;
        tracing::info!(menu_id = %menu_id, actor = %actor, "Menu updated");

        Ok(MenuResponse::from(updated))
    }

    /// 删除菜单
    pub async fn delete(&self, menu_id: &str, actor: &str) -> Result<(), AppError> {
        if !self.repo.delete(menu_id).await? {
            return Err(AppError::not_found(&format!("Menu {}", menu_id)));
        }
        tracing::info!(menu_id = %menu_id, actor = %actor, "Menu deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{common::SortOrder, menu::Menu},
        repository::base::CrudRepository,
    };
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// 内存实现，按 menu_id 排序，只支持 price 排序
    #[derive(Default)]
    struct InMemoryMenuStore {
        menus: Mutex<BTreeMap<String, Menu>>,
    }

    impl InMemoryMenuStore {
        fn matches(menu: &Menu, filters: &MenuFilters) -> bool {
            let contains = |value: &Option<String>, needle: &Option<String>| match needle {
                Some(n) => value
                    .as_deref()
                    .map(|v| v.to_lowercase().contains(&n.to_lowercase()))
                    .unwrap_or(false),
                None => true,
            };

            contains(&Some(menu.menu_name.clone()), &filters.menu_name)
                && contains(&menu.category, &filters.category)
                && filters.use_yn.as_ref().map_or(true, |y| *y == menu.use_yn)
        }
    }

    #[async_trait]
    impl CrudRepository<Menu, str> for InMemoryMenuStore {
        async fn find_by_id(&self, id: &str) -> Result<Option<Menu>, AppError> {
            Ok(self.menus.lock().unwrap().get(id).cloned())
        }

        async fn insert(&self, menu: &Menu) -> Result<Menu, AppError> {
            self.menus
                .lock()
                .unwrap()
                .insert(menu.menu_id.clone(), menu.clone());
            Ok(menu.clone())
        }

        async fn update(&self, menu: &Menu) -> Result<Option<Menu>, AppError> {
            let mut menus = self.menus.lock().unwrap();
            match menus.get_mut(&menu.menu_id) {
                Some(existing) => {
                    *existing = menu.clone();
                    Ok(Some(menu.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, id: &str) -> Result<bool, AppError> {
            Ok(self.menus.lock().unwrap().remove(id).is_some())
        }
    }

    #[async_trait]
    impl MenuStore for InMemoryMenuStore {
        async fn search(
            &self,
            filters: &MenuFilters,
            sort: Option<SortOrder>,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<Menu>, AppError> {
            let mut menus: Vec<Menu> = self
                .menus
                .lock()
                .unwrap()
                .values()
                .filter(|m| Self::matches(m, filters))
                .cloned()
                .collect();

            if let Some(order) = sort {
                assert_eq!(order.column, "price");
                menus.sort_by_key(|m| m.price);
                if order.direction == crate::models::common::SortDirection::Desc {
                    menus.reverse();
                }
            }

            Ok(menus
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn count(&self, filters: &MenuFilters) -> Result<i64, AppError> {
            let menus = self.menus.lock().unwrap();
            Ok(menus.values().filter(|m| Self::matches(m, filters)).count() as i64)
        }
    }

    fn service() -> MenuService<InMemoryMenuStore> {
        MenuService::new(
            InMemoryMenuStore::default(),
            PaginationConfig {
                default_page_size: 10,
                max_page_size: 100,
            },
        )
    }

    fn request(id: &str, price: i64) -> MenuRequest {
        MenuRequest {
            menu_id: id.to_string(),
            menu_name: format!("Menu {}", id),
            price,
            category: Some("Beverage".to_string()),
            description: None,
            use_yn: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service.create(request("MNU-001", 10000), "admin").await.unwrap();
        assert_eq!(created.use_yn, "Y");
        assert_eq!(created.sys_insert_user_id.as_deref(), Some("admin"));

        let fetched = service.get("MNU-001").await.unwrap();
        assert_eq!(fetched.menu_name, "Menu MNU-001");
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let service = service();
        service.create(request("MNU-001", 10000), "admin").await.unwrap();

        let err = service
            .create(request("MNU-001", 5000), "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.user_message(), "Menu ID already exists: MNU-001");
    }

    #[tokio::test]
    async fn test_create_invalid_request_rejected() {
        let service = service();
        let err = service
            .create(request("MNU-001", -1), "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = service().get("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_uses_path_id() {
        let service = service();
        service.create(request("MNU-001", 10000), "admin").await.unwrap();

        let mut req = request("ignored", 12000);
        req.use_yn = Some("N".to_string());
        let updated = service.update("MNU-001", req, "editor").await.unwrap();

        assert_eq!(updated.menu_id, "MNU-001");
        assert_eq!(updated.price, 12000);
        assert_eq!(updated.use_yn, "N");
        assert_eq!(updated.sys_update_user_id.as_deref(), Some("editor"));

        let err = service
            .update("missing", request("missing", 1), "editor")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        service.create(request("MNU-001", 10000), "admin").await.unwrap();

        service.delete("MNU-001", "admin").await.unwrap();
        assert!(matches!(
            service.delete("MNU-001", "admin").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_paging_and_sort() {
        let service = service();
        for (i, price) in [3000, 1000, 2000].into_iter().enumerate() {
            service
                .create(request(&format!("MNU-00{}", i), price), "admin")
                .await
                .unwrap();
        }

        let query = MenuListQuery {
            page: Some(1),
            size: Some(2),
            sort: Some("price,desc".to_string()),
            ..Default::default()
        };
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.page_size, 2);
        let prices: Vec<i64> = page.list.iter().map(|m| m.price).collect();
        assert_eq!(prices, vec![3000, 2000]);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_field() {
        let query = MenuListQuery {
            sort: Some("user_pwd,asc".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service().list(&query).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let service = service();
        service.create(request("MNU-001", 1000), "admin").await.unwrap();
        let mut food = request("MNU-002", 2000);
        food.category = Some("Food".to_string());
        service.create(food, "admin").await.unwrap();

        let query = MenuListQuery {
            category: Some("food".to_string()),
            ..Default::default()
        };
        let page = service.list(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].menu_id, "MNU-002");
    }
}
