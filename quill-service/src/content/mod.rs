mod post_service;

pub use post_service::{FileBackedPostService, PostPage, PostQuery, PostService, SortField};

/// 分区目录常量
pub const PUBLISHED_DIR: &str = "Published";
pub const DRAFTS_DIR: &str = "Drafts";

/// 文章正文文件名
pub const CONTENT_FILE: &str = "content.md";
