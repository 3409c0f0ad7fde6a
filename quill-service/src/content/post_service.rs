use async_trait::async_trait;
use chrono::Utc;
use quill_domain::{AuthenticatedUser, BlogPost, BlogPostMetadata, PublishStatus, SiteMetadata};
use quill_infra::fs::FileSystemService;
use quill_infra::metadata::MetadataStore;
use quill_infra::redirect::RedirectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::url;

use super::{CONTENT_FILE, DRAFTS_DIR, PUBLISHED_DIR};

/// 列表排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    CreatedAt,
    #[default]
    PublishedAt,
    ModifiedAt,
}

impl SortField {
    /// 解析排序字段名，未识别时回退到PublishedAt
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "title" => Self::Title,
            "createdat" => Self::CreatedAt,
            "publishedat" => Self::PublishedAt,
            "modifiedat" => Self::ModifiedAt,
            _ => Self::PublishedAt,
        }
    }
}

/// 文章查询参数
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub page: u32,
    pub page_size: u32,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub include_drafts: bool,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub descending: bool,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            category: None,
            tag: None,
            author: None,
            include_drafts: false,
            search: None,
            sort_by: SortField::PublishedAt,
            descending: true,
        }
    }
}

/// 一页文章及过滤后的总数
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<BlogPost>,
    pub total: usize,
}

/// 文章存储trait
/// 目录扫描式查询隐藏在该接口之后，便于替换为带索引的实现
#[async_trait]
pub trait PostService: Send + Sync {
    /// 创建文章，分配id、时间戳和slug
    async fn create(&self, post: BlogPost, author: &AuthenticatedUser) -> Result<BlogPost>;

    /// 按slug查找，先搜索Published分区再搜索Drafts分区
    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;

    /// 按id直接定位文章目录
    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>>;

    /// 列出文章，支持过滤、排序与分页
    async fn list(&self, query: PostQuery) -> Result<PostPage>;

    /// 更新文章，仅作者本人可操作
    async fn update(&self, id: &str, post: BlogPost, requester: &str) -> Result<BlogPost>;

    /// 删除文章及其整个目录，仅作者本人可操作
    async fn delete(&self, id: &str, requester: &str) -> Result<()>;
}

/// 基于文件系统的文章存储实现
/// 每篇文章一个目录：content.md + meta.json
pub struct FileBackedPostService {
    fs: Arc<dyn FileSystemService>,
    metadata: Arc<MetadataStore>,
    redirects: Arc<RedirectStore>,
}

impl FileBackedPostService {
    pub fn new(
        fs: Arc<dyn FileSystemService>,
        metadata: Arc<MetadataStore>,
        redirects: Arc<RedirectStore>,
    ) -> Self {
        Self {
            fs,
            metadata,
            redirects,
        }
    }

    fn partition_dir(&self, status: PublishStatus) -> PathBuf {
        let partition = if status == PublishStatus::Published {
            PUBLISHED_DIR
        } else {
            DRAFTS_DIR
        };
        self.fs.posts_dir().join(partition)
    }

    fn post_dir(&self, post: &BlogPost) -> PathBuf {
        self.partition_dir(post.status).join(&post.id)
    }

    /// 将文章的正文和元数据写入指定目录
    async fn write_post(&self, post: &BlogPost, directory: &Path) -> Result<()> {
        self.fs.ensure_directory(directory).await?;

        let content_path = directory.join(CONTENT_FILE);
        self.fs.write_text(&content_path, &post.content).await?;

        let mut metadata = BlogPostMetadata::from_post(post);
        metadata.content_file_path = content_path;
        metadata.directory_path = directory.to_path_buf();

        let metadata_path = self.metadata.post_metadata_path(directory);
        self.metadata.write_metadata(&metadata_path, &metadata).await?;
        Ok(())
    }

    /// 从文章目录读回完整的BlogPost
    async fn read_post(&self, directory: &Path) -> Result<Option<BlogPost>> {
        let metadata_path = self.metadata.post_metadata_path(directory);
        let metadata: Option<BlogPostMetadata> =
            self.metadata.read_metadata(&metadata_path).await?;

        match metadata {
            Some(metadata) => {
                let content = self.fs.read_text(&metadata.content_file_path).await?;
                Ok(Some(metadata.into_post(content)))
            }
            None => Ok(None),
        }
    }

    /// 在一个分区内线性扫描slug
    async fn find_by_slug_in(&self, partition: &Path, slug: &str) -> Result<Option<BlogPost>> {
        if !self.fs.directory_exists(partition) {
            return Ok(None);
        }

        for post_dir in self.fs.list_subdirectories(partition).await? {
            let metadata_path = self.metadata.post_metadata_path(&post_dir);
            let metadata: Option<BlogPostMetadata> =
                self.metadata.read_metadata(&metadata_path).await?;

            if let Some(metadata) = metadata {
                if metadata.slug == slug {
                    let content = self.fs.read_text(&metadata.content_file_path).await?;
                    return Ok(Some(metadata.into_post(content)));
                }
            }
        }
        Ok(None)
    }

    /// 读取一个分区下的全部文章
    async fn load_partition(&self, partition: &Path) -> Result<Vec<BlogPost>> {
        let mut posts = Vec::new();
        if !self.fs.directory_exists(partition) {
            return Ok(posts);
        }

        for post_dir in self.fs.list_subdirectories(partition).await? {
            if let Some(post) = self.read_post(&post_dir).await? {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    /// 将文章携带的新标签和新分类并入站点元数据
    async fn update_site_metadata(&self, post: &BlogPost) -> Result<()> {
        let site_path = self.metadata.site_metadata_path();
        let mut site: SiteMetadata = self
            .metadata
            .read_metadata(&site_path)
            .await?
            .unwrap_or_default();

        site.absorb(&post.tags, &post.categories);
        site.last_updated = Utc::now();

        self.metadata.write_metadata(&site_path, &site).await?;
        Ok(())
    }

    fn apply_sorting(posts: &mut [BlogPost], sort_by: SortField, descending: bool) {
        match sort_by {
            SortField::Title => posts.sort_by(|a, b| a.title.cmp(&b.title)),
            SortField::CreatedAt => posts.sort_by_key(|p| p.created_at),
            SortField::PublishedAt => posts.sort_by_key(|p| p.published_at),
            SortField::ModifiedAt => posts.sort_by_key(|p| p.modified_at),
        }
        if descending {
            posts.reverse();
        }
    }
}

#[async_trait]
impl PostService for FileBackedPostService {
    async fn create(&self, mut post: BlogPost, author: &AuthenticatedUser) -> Result<BlogPost> {
        post.id = Uuid::new_v4().to_string();
        post.author_username = author.username.clone();
        post.author_display_name = author.display_name.clone();
        post.created_at = Utc::now();
        post.modified_at = Some(post.created_at);

        if post.slug.trim().is_empty() {
            post.slug = url::generate_slug(&post.title);
        }

        if post.status == PublishStatus::Published {
            post.published_at = Some(Utc::now());
        }

        let directory = self.post_dir(&post);
        self.write_post(&post, &directory).await?;
        self.update_site_metadata(&post).await?;

        info!("Created post {} ({})", post.id, post.slug);
        Ok(post)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let published = self.fs.posts_dir().join(PUBLISHED_DIR);
        if let Some(post) = self.find_by_slug_in(&published, slug).await? {
            return Ok(Some(post));
        }

        let drafts = self.fs.posts_dir().join(DRAFTS_DIR);
        self.find_by_slug_in(&drafts, slug).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>> {
        for partition in [PUBLISHED_DIR, DRAFTS_DIR] {
            let post_dir = self.fs.posts_dir().join(partition).join(id);
            if self.fs.directory_exists(&post_dir) {
                if let Some(post) = self.read_post(&post_dir).await? {
                    return Ok(Some(post));
                }
            }
        }
        Ok(None)
    }

    async fn list(&self, query: PostQuery) -> Result<PostPage> {
        let mut posts = self
            .load_partition(&self.fs.posts_dir().join(PUBLISHED_DIR))
            .await?;

        if query.include_drafts {
            let drafts = self
                .load_partition(&self.fs.posts_dir().join(DRAFTS_DIR))
                .await?;
            posts.extend(drafts);
        }

        if let Some(ref category) = query.category {
            posts.retain(|p| p.categories.contains(category));
        }

        if let Some(ref tag) = query.tag {
            posts.retain(|p| p.tags.contains(tag));
        }

        if let Some(ref author) = query.author {
            posts.retain(|p| &p.author_username == author);
        }

        if let Some(ref search) = query.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                posts.retain(|p| {
                    p.title.to_lowercase().contains(&needle)
                        || p.description.to_lowercase().contains(&needle)
                        || p.content.to_lowercase().contains(&needle)
                });
            }
        }

        Self::apply_sorting(&mut posts, query.sort_by, query.descending);

        let total = posts.len();
        let page_size = query.page_size.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * page_size;
        let posts = posts.into_iter().skip(skip).take(page_size).collect();

        Ok(PostPage { posts, total })
    }

    async fn update(&self, id: &str, mut updated: BlogPost, requester: &str) -> Result<BlogPost> {
        let original = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("post {}", id)))?;

        if original.author_username != requester {
            warn!(
                "User {} attempted to update post owned by {}",
                requester, original.author_username
            );
            return Err(ServiceError::forbidden("requester is not the post author"));
        }

        updated.id = original.id.clone();
        updated.author_username = original.author_username.clone();
        updated.author_display_name = original.author_display_name.clone();
        updated.created_at = original.created_at;
        updated.modified_at = Some(Utc::now());

        let new_slug = if updated.slug.trim().is_empty() {
            url::generate_slug(&updated.title)
        } else {
            updated.slug.clone()
        };

        if url::needs_redirect(&original.slug, &new_slug) {
            self.redirects
                .add(
                    &format!("blog/{}", original.slug),
                    &format!("blog/{}", new_slug),
                    301,
                )
                .await?;
            info!("Added redirect from {} to {}", original.slug, new_slug);
        }
        updated.slug = new_slug;

        // 首次进入Published状态时打上发布时间，之后保持不变
        if original.status != PublishStatus::Published
            && updated.status == PublishStatus::Published
        {
            updated.published_at = Some(Utc::now());
        } else {
            updated.published_at = original.published_at;
        }

        let original_dir = self.post_dir(&original);
        let new_dir = self.post_dir(&updated);
        let needs_move = original_dir != new_dir;

        self.write_post(&updated, &new_dir).await?;

        if needs_move && self.fs.directory_exists(&original_dir) {
            self.fs.delete_directory(&original_dir).await?;
        }

        self.update_site_metadata(&updated).await?;

        info!("Updated post {} ({})", updated.id, updated.slug);
        Ok(updated)
    }

    async fn delete(&self, id: &str, requester: &str) -> Result<()> {
        let post = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("post {}", id)))?;

        if post.author_username != requester {
            warn!(
                "User {} attempted to delete post owned by {}",
                requester, post.author_username
            );
            return Err(ServiceError::forbidden("requester is not the post author"));
        }

        let directory = self.post_dir(&post);
        if !self.fs.directory_exists(&directory) {
            return Err(ServiceError::not_found(format!("post directory {}", id)));
        }

        self.fs.delete_directory(&directory).await?;
        info!("Deleted post {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_infra::fs::LocalFileSystemService;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        service: FileBackedPostService,
        redirects: Arc<RedirectStore>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let fs: Arc<dyn FileSystemService> =
            Arc::new(LocalFileSystemService::new(dir.path().to_path_buf()).unwrap());
        let metadata = Arc::new(MetadataStore::new(fs.clone()));
        let redirects = Arc::new(RedirectStore::new(fs.clone()));
        let service = FileBackedPostService::new(fs, metadata, redirects.clone());
        Fixture {
            _dir: dir,
            service,
            redirects,
        }
    }

    fn author(username: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            username: username.to_string(),
            display_name: format!("{} Display", username),
            roles: vec!["Author".to_string()],
        }
    }

    fn draft(title: &str) -> BlogPost {
        BlogPost {
            title: title.to_string(),
            description: "A post".to_string(),
            content: format!("Body of {}", title),
            tags: vec!["rust".to_string()],
            categories: vec!["dev".to_string()],
            ..Default::default()
        }
    }

    fn published(title: &str) -> BlogPost {
        BlogPost {
            status: PublishStatus::Published,
            ..draft(title)
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_slug_round_trip() {
        let fx = fixture();

        let created = fx
            .service
            .create(published("Hello World"), &author("jane"))
            .await
            .unwrap();
        assert_eq!(created.slug, "hello-world");
        assert!(created.published_at.is_some());

        let fetched = fx.service.get_by_slug("hello-world").await.unwrap().unwrap();
        assert_eq!(fetched.title, created.title);
        assert_eq!(fetched.content, created.content);
        assert_eq!(fetched.tags, created.tags);
        assert_eq!(fetched.categories, created.categories);
        assert_eq!(fetched.author_username, "jane");
    }

    #[tokio::test]
    async fn test_get_by_slug_miss_returns_none() {
        let fx = fixture();
        assert!(fx.service.get_by_slug("nope").await.unwrap().is_none());
        assert!(fx.service.get_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_probes_both_partitions() {
        let fx = fixture();

        let d = fx
            .service
            .create(draft("Draft One"), &author("jane"))
            .await
            .unwrap();
        let p = fx
            .service
            .create(published("Published One"), &author("jane"))
            .await
            .unwrap();

        assert!(fx.service.get_by_id(&d.id).await.unwrap().is_some());
        assert!(fx.service.get_by_id(&p.id).await.unwrap().is_some());
        assert!(fx.service.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_excludes_drafts_by_default() {
        let fx = fixture();
        fx.service
            .create(draft("Draft"), &author("jane"))
            .await
            .unwrap();
        fx.service
            .create(published("Live"), &author("jane"))
            .await
            .unwrap();

        let page = fx.service.list(PostQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.posts[0].title, "Live");

        let page = fx
            .service
            .list(PostQuery {
                include_drafts: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_list_pagination_last_page_and_beyond() {
        let fx = fixture();
        for i in 0..5 {
            fx.service
                .create(published(&format!("Post {}", i)), &author("jane"))
                .await
                .unwrap();
        }

        let last = fx
            .service
            .list(PostQuery {
                page: 3,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(last.total, 5);
        assert_eq!(last.posts.len(), 1);

        let beyond = fx
            .service
            .list(PostQuery {
                page: 4,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(beyond.total, 5);
        assert!(beyond.posts.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_search() {
        let fx = fixture();
        let mut tagged = published("Tagged");
        tagged.tags = vec!["axum".to_string()];
        fx.service.create(tagged, &author("jane")).await.unwrap();
        fx.service
            .create(published("Other"), &author("omar"))
            .await
            .unwrap();

        let by_tag = fx
            .service
            .list(PostQuery {
                tag: Some("axum".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_tag.total, 1);
        assert_eq!(by_tag.posts[0].title, "Tagged");

        let by_author = fx
            .service
            .list(PostQuery {
                author: Some("omar".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_author.total, 1);

        let by_search = fx
            .service
            .list(PostQuery {
                search: Some("BODY OF OTHER".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.total, 1);
        assert_eq!(by_search.posts[0].title, "Other");
    }

    #[tokio::test]
    async fn test_update_rejects_non_author() {
        let fx = fixture();
        let created = fx
            .service
            .create(published("Mine"), &author("jane"))
            .await
            .unwrap();

        let result = fx
            .service
            .update(&created.id, draft("Stolen"), "mallory")
            .await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        let result = fx.service.update("missing", draft("Ghost"), "jane").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_creation_time() {
        let fx = fixture();
        let created = fx
            .service
            .create(draft("Original"), &author("jane"))
            .await
            .unwrap();

        let mut replacement = draft("Renamed");
        replacement.id = "forged-id".to_string();
        replacement.author_username = "mallory".to_string();

        let updated = fx
            .service
            .update(&created.id, replacement, "jane")
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.author_username, "jane");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_publish_transition_sets_timestamp_once() {
        let fx = fixture();
        let created = fx
            .service
            .create(draft("Becoming"), &author("jane"))
            .await
            .unwrap();
        assert!(created.published_at.is_none());

        let mut publish = draft("Becoming");
        publish.status = PublishStatus::Published;
        let first = fx
            .service
            .update(&created.id, publish.clone(), "jane")
            .await
            .unwrap();
        let first_published_at = first.published_at.unwrap();

        publish.content = "Edited after publish".to_string();
        let second = fx
            .service
            .update(&created.id, publish, "jane")
            .await
            .unwrap();
        assert_eq!(second.published_at.unwrap(), first_published_at);
    }

    #[tokio::test]
    async fn test_publish_transition_moves_partition() {
        let fx = fixture();
        let created = fx
            .service
            .create(draft("Mover"), &author("jane"))
            .await
            .unwrap();

        let mut publish = draft("Mover");
        publish.status = PublishStatus::Published;
        fx.service
            .update(&created.id, publish, "jane")
            .await
            .unwrap();

        // 旧的草稿目录被删除，新的发布目录可以按id直接命中
        let fetched = fx.service.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, PublishStatus::Published);

        let drafts_dir = fx.service.fs.posts_dir().join(DRAFTS_DIR).join(&created.id);
        assert!(!fx.service.fs.directory_exists(&drafts_dir));
    }

    #[tokio::test]
    async fn test_slug_change_records_redirect() {
        let fx = fixture();
        let created = fx
            .service
            .create(published("First Title"), &author("jane"))
            .await
            .unwrap();
        assert_eq!(created.slug, "first-title");

        let mut renamed = published("Second Title");
        renamed.status = PublishStatus::Published;
        fx.service
            .update(&created.id, renamed, "jane")
            .await
            .unwrap();

        let entry = fx.redirects.lookup("blog/first-title").await.unwrap();
        assert_eq!(entry.new_url, "blog/second-title");
        assert_eq!(entry.status_code, 301);
    }

    #[tokio::test]
    async fn test_delete_requires_author() {
        let fx = fixture();
        let created = fx
            .service
            .create(published("Doomed"), &author("jane"))
            .await
            .unwrap();

        let result = fx.service.delete(&created.id, "mallory").await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        fx.service.delete(&created.id, "jane").await.unwrap();
        assert!(fx.service.get_by_id(&created.id).await.unwrap().is_none());

        let result = fx.service.delete(&created.id, "jane").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_site_metadata_accumulates_tags() {
        let fx = fixture();
        fx.service
            .create(published("One"), &author("jane"))
            .await
            .unwrap();

        let mut second = published("Two");
        second.tags = vec!["rust".to_string(), "axum".to_string()];
        fx.service.create(second, &author("jane")).await.unwrap();

        let site: SiteMetadata = fx
            .service
            .metadata
            .read_metadata(&fx.service.metadata.site_metadata_path())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(site.all_tags, vec!["rust", "axum"]);
        assert_eq!(site.all_categories, vec!["dev"]);
    }
}
