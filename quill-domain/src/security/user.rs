use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ROLE_ADMIN, ROLE_AUTHOR};

/// User实体，持久化为Users/<username>/profile.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "displayName", default)]
    pub display_name: String,

    #[serde(rename = "passwordHash", default)]
    pub password_hash: String, // bcrypt哈希

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// 对外公开的用户资料（不含密码哈希）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,

    #[serde(rename = "displayName", default)]
    pub display_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            created_at: user.created_at,
        }
    }
}

/// 经过认证的用户信息
/// 由认证中间件从JWT解出并注入请求扩展
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }

    pub fn can_publish(&self) -> bool {
        self.is_admin() || self.roles.iter().any(|r| r == ROLE_AUTHOR)
    }
}
