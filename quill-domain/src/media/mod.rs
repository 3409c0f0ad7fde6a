use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// MediaFileInfo描述一个已上传的媒体文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFileInfo {
    #[serde(rename = "fileName")]
    pub file_name: String,

    #[serde(rename = "filePath")]
    pub file_path: PathBuf,

    pub url: String,

    #[serde(rename = "fileSize")]
    pub file_size: u64,

    #[serde(rename = "contentType")]
    pub content_type: String,

    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
}
