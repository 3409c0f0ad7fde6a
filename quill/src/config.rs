use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub blog: BlogConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8090,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// 博客内容根目录，所有文章、媒体和用户数据都存放在这里
    pub content_root: PathBuf,
    pub base_url: String,
    pub posts_per_page: usize,
    /// 注册新用户是否仅限管理员
    pub require_admin_for_registration: bool,
}

impl Default for BlogConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            content_root: cwd.join("BlogContent"),
            base_url: "/".to_string(),
            posts_per_page: 10,
            require_admin_for_registration: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiration: u64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "quill".to_string(),
            jwt_expiration: 3600,
            bcrypt_cost: 12,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            blog: BlogConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // 如果存在.env文件，加载它
        let _ = dotenv::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("quill.toml").required(false))
            .add_source(config::Environment::with_prefix("QUILL").separator("__"));

        let config = builder.build()?;
        config.try_deserialize()
    }
}
