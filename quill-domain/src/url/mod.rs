use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RedirectEntry表示一条旧路径到新路径的重定向
/// 以规范化后的旧路径为键，持久化在redirects.json中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectEntry {
    #[serde(rename = "newUrl")]
    pub new_url: String,

    #[serde(rename = "statusCode", default = "default_status_code")]
    pub status_code: u16,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

fn default_status_code() -> u16 {
    301
}

impl RedirectEntry {
    pub fn new(new_url: impl Into<String>, status_code: u16) -> Self {
        Self {
            new_url: new_url.into(),
            status_code,
            created_at: Utc::now(),
        }
    }
}
