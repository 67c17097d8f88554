//! User repository (数据库访问层)
//! 只提供认证所需的凭据查询

use crate::{
    error::AppError,
    models::{
        role::Role,
        user::{CredentialRecord, UserRow},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// 凭据查询能力，由认证服务注入使用
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 查找启用状态的用户，不存在或已停用时返回 None
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<CredentialRecord>, AppError>;
}

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 查询用户角色，无法识别的角色名跳过
    async fn find_roles(&self, user_id: &str) -> Result<HashSet<Role>, AppError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT role_name FROM tb_user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let roles = names
            .iter()
            .filter_map(|name| match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Skipping unknown role");
                    None
                }
            })
            .collect();

        Ok(roles)
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<CredentialRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, user_pwd, user_name, email, use_yn, sys_insert_dtm
            FROM tb_users
            WHERE user_id = $1 AND use_yn = 'Y'
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let roles = self.find_roles(&row.user_id).await?;
        Ok(Some(CredentialRecord::from_row(row, roles)))
    }
}

/// 内存凭据存储，用于测试和本地联调
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.put(record);
        }
        store
    }

    /// 新增或覆盖一条记录
    pub fn put(&self, record: CredentialRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(record.user_id.clone(), record);
        }
    }

    pub fn remove(&self, user_id: &str) {
        if let Ok(mut records) = self.records.write() {
            records.remove(user_id);
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<CredentialRecord>, AppError> {
        let records = self
            .records
            .read()
            .map_err(|_| AppError::internal_error("credential store lock poisoned"))?;
        Ok(records.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: &str) -> CredentialRecord {
        CredentialRecord {
            user_id: user_id.to_string(),
            password_hash: "encodedPassword".to_string(),
            display_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            roles: [Role::User].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_store_lookup() {
        let store = InMemoryCredentialStore::with_records([record("testuser")]);

        let found = store.find_by_user_id("testuser").await.unwrap();
        assert_eq!(found.map(|r| r.user_id), Some("testuser".to_string()));
        assert!(store.find_by_user_id("nobody").await.unwrap().is_none());

        store.remove("testuser");
        assert!(store.find_by_user_id("testuser").await.unwrap().is_none());
    }
}
