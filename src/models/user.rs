//! User domain models

use super::role::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Row of `tb_users` as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub user_pwd: String,
    pub user_name: String,
    pub email: Option<String>,
    pub use_yn: String,
    pub sys_insert_dtm: DateTime<Utc>,
}

/// Credential record resolved by the credential store
///
/// Read-only from the auth core's point of view. `password_hash` must never
/// leave the service layer.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user_id: String,
    pub password_hash: String,
    pub display_name: String,
    pub email: String,
    pub roles: HashSet<Role>,
}

impl CredentialRecord {
    pub fn from_row(row: UserRow, roles: HashSet<Role>) -> Self {
        Self {
            user_id: row.user_id,
            password_hash: row.user_pwd,
            display_name: row.user_name,
            email: row.email.unwrap_or_default(),
            roles,
        }
    }
}

/// User summary returned to clients (without sensitive data)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub roles: Vec<Role>,
}

impl From<&CredentialRecord> for UserInfoResponse {
    fn from(record: &CredentialRecord) -> Self {
        let mut roles: Vec<Role> = record.roles.iter().copied().collect();
        roles.sort();

        Self {
            user_id: record.user_id.clone(),
            user_name: record.display_name.clone(),
            user_email: record.email.clone(),
            roles,
        }
    }
}
