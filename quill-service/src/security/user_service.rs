use async_trait::async_trait;
use chrono::Utc;
use quill_domain::User;
use quill_infra::fs::FileSystemService;
use quill_infra::security::JwtService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::security::PasswordService;

/// 用户profile文件名
const PROFILE_FILE: &str = "profile.json";

/// 用户服务trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// 获取用户
    async fn get(&self, username: &str) -> Result<Option<User>>;

    /// 保存用户
    async fn save(&self, user: &User) -> Result<()>;

    /// 创建用户，用户名已存在时失败
    async fn create(
        &self,
        username: &str,
        email: &str,
        display_name: &str,
        password: &str,
        roles: Vec<String>,
    ) -> Result<User>;

    /// 认证用户，成功时返回JWT令牌
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<String>>;

    /// 列出所有用户名
    async fn list(&self) -> Result<Vec<String>>;
}

/// 基于文件系统的用户服务
/// 每个用户一个目录：Users/<username>/profile.json
pub struct FileBackedUserService {
    fs: Arc<dyn FileSystemService>,
    passwords: Arc<dyn PasswordService>,
    jwt: Arc<JwtService>,
}

impl FileBackedUserService {
    pub fn new(
        fs: Arc<dyn FileSystemService>,
        passwords: Arc<dyn PasswordService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self { fs, passwords, jwt }
    }

    fn profile_path(&self, username: &str) -> PathBuf {
        self.fs.users_dir().join(username).join(PROFILE_FILE)
    }
}

#[async_trait]
impl UserService for FileBackedUserService {
    async fn get(&self, username: &str) -> Result<Option<User>> {
        let path = self.profile_path(username);
        if !self.fs.file_exists(&path).await {
            return Ok(None);
        }

        let json = self.fs.read_text(&path).await?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn save(&self, user: &User) -> Result<()> {
        let path = self.profile_path(&user.username);
        let json = serde_json::to_string_pretty(user)?;
        self.fs.write_text(&path, &json).await?;
        Ok(())
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        display_name: &str,
        password: &str,
        roles: Vec<String>,
    ) -> Result<User> {
        if self.get(username).await?.is_some() {
            return Err(ServiceError::Validation(format!(
                "username {} already exists",
                username
            )));
        }

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            password_hash: self.passwords.hash(password).await?,
            roles,
            created_at: Utc::now(),
            last_login: None,
        };

        self.save(&user).await?;
        info!("Created user {}", username);
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<String>> {
        let mut user = match self.get(username).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            return Ok(None);
        }

        user.last_login = Some(Utc::now());
        self.save(&user).await?;

        let token = self
            .jwt
            .generate(&user.username, &user.display_name, &user.roles)
            .map_err(ServiceError::Storage)?;
        Ok(Some(token))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let users_dir = self.fs.users_dir();
        let mut usernames = Vec::new();

        for path in self.fs.list_files(&users_dir)? {
            if path.file_name().and_then(|n| n.to_str()) != Some(PROFILE_FILE) {
                continue;
            }
            if let Some(username) = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
            {
                usernames.push(username.to_string());
            }
        }

        usernames.sort();
        Ok(usernames)
    }
}
