use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// BlogPost实体
/// 内容正文与元数据成对存储在文章目录下（content.md + meta.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,

    pub title: String,

    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(rename = "authorUsername", default)]
    pub author_username: String,

    #[serde(rename = "authorDisplayName", default)]
    pub author_display_name: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(rename = "modifiedAt")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: PublishStatus,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(rename = "featuredImage", default)]
    pub featured_image: String,
}

impl BlogPost {
    /// 检查文章是否已发布
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

impl Default for BlogPost {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            slug: String::new(),
            description: String::new(),
            content: String::new(),
            author_username: String::new(),
            author_display_name: String::new(),
            created_at: Utc::now(),
            published_at: None,
            modified_at: None,
            status: PublishStatus::Draft,
            tags: Vec::new(),
            categories: Vec::new(),
            featured_image: String::new(),
        }
    }
}

/// PublishStatus表示文章的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Scheduled,
}

/// BlogPostMetadata是文章的JSON侧车元数据（meta.json）
/// 包含除正文之外的全部字段以及两个文件定位路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostMetadata {
    pub id: String,

    pub title: String,

    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "authorUsername", default)]
    pub author_username: String,

    #[serde(rename = "authorDisplayName", default)]
    pub author_display_name: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(rename = "modifiedAt")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: PublishStatus,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(rename = "featuredImage", default)]
    pub featured_image: String,

    #[serde(rename = "contentFilePath", default)]
    pub content_file_path: PathBuf,

    #[serde(rename = "directoryPath", default)]
    pub directory_path: PathBuf,
}

impl BlogPostMetadata {
    /// 从BlogPost构建元数据（不含正文，路径留待调用方填写）
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            description: post.description.clone(),
            author_username: post.author_username.clone(),
            author_display_name: post.author_display_name.clone(),
            created_at: post.created_at,
            published_at: post.published_at,
            modified_at: post.modified_at,
            status: post.status,
            tags: post.tags.clone(),
            categories: post.categories.clone(),
            featured_image: post.featured_image.clone(),
            content_file_path: PathBuf::new(),
            directory_path: PathBuf::new(),
        }
    }

    /// 用元数据和正文还原出完整的BlogPost
    pub fn into_post(self, content: String) -> BlogPost {
        BlogPost {
            id: self.id,
            title: self.title,
            slug: self.slug,
            description: self.description,
            content,
            author_username: self.author_username,
            author_display_name: self.author_display_name,
            created_at: self.created_at,
            published_at: self.published_at,
            modified_at: self.modified_at,
            status: self.status,
            tags: self.tags,
            categories: self.categories,
            featured_image: self.featured_image,
        }
    }
}
