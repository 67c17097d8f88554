//! 通用仓储接口
//! 每个实体各自实现，服务层只依赖接口

use crate::error::AppError;
use async_trait::async_trait;

/// 单实体的基础增删改查
#[async_trait]
pub trait CrudRepository<T, K>: Send + Sync
where
    T: Send + Sync + 'static,
    K: Send + Sync + ?Sized,
{
    /// 根据主键查找
    async fn find_by_id(&self, id: &K) -> Result<Option<T>, AppError>;

    /// 主键是否存在
    async fn exists(&self, id: &K) -> Result<bool, AppError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// 插入并返回持久化后的实体
    async fn insert(&self, entity: &T) -> Result<T, AppError>;

    /// 按主键更新，记录不存在时返回 None
    async fn update(&self, entity: &T) -> Result<Option<T>, AppError>;

    /// 按主键删除，返回是否删除了记录
    async fn delete(&self, id: &K) -> Result<bool, AppError>;
}
