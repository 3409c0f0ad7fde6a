use async_trait::async_trait;
use chrono::Utc;
use quill_domain::MediaFileInfo;
use quill_infra::fs::FileSystemService;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Result, ServiceError};
use crate::url::UrlService;

/// 媒体服务trait
#[async_trait]
pub trait MediaService: Send + Sync {
    /// 上传文件到用户的媒体目录，返回生成的文件信息
    async fn upload(
        &self,
        file_name: &str,
        content: &[u8],
        username: &str,
    ) -> Result<MediaFileInfo>;

    /// 列出用户的全部媒体文件，按修改时间倒序
    async fn list_user_media(&self, username: &str) -> Result<Vec<MediaFileInfo>>;

    /// 删除用户媒体目录下的文件
    async fn delete(&self, file_path: &Path, username: &str) -> Result<()>;
}

/// 基于文件系统的媒体服务
/// 按用户分目录存放：Media/<username>/<唯一文件名>
pub struct FileBackedMediaService {
    fs: Arc<dyn FileSystemService>,
    urls: Arc<UrlService>,
}

impl FileBackedMediaService {
    pub fn new(fs: Arc<dyn FileSystemService>, urls: Arc<UrlService>) -> Self {
        Self { fs, urls }
    }

    fn user_media_dir(&self, username: &str) -> PathBuf {
        self.fs.media_dir().join(username)
    }

    /// 给原始文件名拼上时间戳避免重名覆盖
    fn unique_file_name(original: &str) -> String {
        let path = Path::new(original);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("upload");
        let timestamp = Utc::now().format("%Y%m%d%H%M%S");

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}_{}.{}", stem, timestamp, ext.to_lowercase()),
            None => format!("{}_{}", stem, timestamp),
        }
    }

    async fn file_info(&self, username: &str, path: PathBuf) -> Result<MediaFileInfo> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(MediaFileInfo {
            url: self.urls.media_url(username, &file_name),
            file_size: self.fs.file_size(&path).await?,
            content_type: content_type_from_extension(&path),
            last_modified: self.fs.modified_at(&path).await?,
            file_name,
            file_path: path,
        })
    }
}

#[async_trait]
impl MediaService for FileBackedMediaService {
    async fn upload(
        &self,
        file_name: &str,
        content: &[u8],
        username: &str,
    ) -> Result<MediaFileInfo> {
        let user_dir = self.user_media_dir(username);
        self.fs.ensure_directory(&user_dir).await?;

        let unique_name = Self::unique_file_name(file_name);
        let file_path = user_dir.join(&unique_name);
        self.fs.write_bytes(&file_path, content).await?;

        info!("Uploaded media {} for {}", unique_name, username);
        self.file_info(username, file_path).await
    }

    async fn list_user_media(&self, username: &str) -> Result<Vec<MediaFileInfo>> {
        let user_dir = self.user_media_dir(username);
        if !self.fs.directory_exists(&user_dir) {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for path in self.fs.list_files(&user_dir)? {
            files.push(self.file_info(username, path).await?);
        }

        files.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(files)
    }

    async fn delete(&self, file_path: &Path, username: &str) -> Result<()> {
        // 前缀比较按组件进行，不会解析..，必须先排除相对组件
        let user_dir = self.user_media_dir(username);
        if has_relative_components(file_path) || !file_path.starts_with(&user_dir) {
            warn!(
                "User {} attempted to delete file outside their media directory",
                username
            );
            return Err(ServiceError::forbidden(
                "file is outside the user's media directory",
            ));
        }

        if !self.fs.file_exists(file_path).await {
            return Err(ServiceError::not_found(format!(
                "media file {}",
                file_path.display()
            )));
        }

        self.fs.delete_file(file_path).await?;
        Ok(())
    }
}

/// 路径是否携带..或.组件
/// 这类路径在文件系统层才会被解析，可能指向用户目录之外
fn has_relative_components(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir | Component::CurDir))
}

/// 根据扩展名推断Content-Type
fn content_type_from_extension(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let content_type = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "md" => "text/markdown",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    };
    content_type.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_infra::fs::LocalFileSystemService;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        service: FileBackedMediaService,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let fs: Arc<dyn FileSystemService> =
            Arc::new(LocalFileSystemService::new(dir.path().to_path_buf()).unwrap());
        let urls = Arc::new(UrlService::new("https://example.com"));
        Fixture {
            _dir: dir,
            service: FileBackedMediaService::new(fs, urls),
        }
    }

    #[tokio::test]
    async fn test_upload_generates_unique_name_and_url() {
        let fx = fixture();

        let info = fx
            .service
            .upload("photo.PNG", b"fake-bytes", "jane")
            .await
            .unwrap();
        assert!(info.file_name.starts_with("photo_"));
        assert!(info.file_name.ends_with(".png"));
        assert_eq!(info.content_type, "image/png");
        assert_eq!(info.file_size, 10);
        assert_eq!(
            info.url,
            format!("https://example.com/media/jane/{}", info.file_name)
        );
    }

    #[tokio::test]
    async fn test_list_returns_uploaded_files() {
        let fx = fixture();
        fx.service.upload("a.txt", b"a", "jane").await.unwrap();
        fx.service.upload("b.txt", b"b", "jane").await.unwrap();

        let files = fx.service.list_user_media("jane").await.unwrap();
        assert_eq!(files.len(), 2);

        assert!(fx
            .service
            .list_user_media("nobody")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_rejects_parent_dir_traversal() {
        let fx = fixture();
        let victim = fx.service.upload("secret.txt", b"s", "omar").await.unwrap();

        // jane自己目录下的路径，但..让它落到omar的目录里
        let file_name = victim.file_path.file_name().unwrap();
        let sneaky = fx
            .service
            .user_media_dir("jane")
            .join("..")
            .join("omar")
            .join(file_name);

        let result = fx.service.delete(&sneaky, "jane").await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        let remaining = fx.service.list_user_media("omar").await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_refuses_foreign_paths() {
        let fx = fixture();
        let info = fx.service.upload("a.txt", b"a", "jane").await.unwrap();

        let result = fx.service.delete(&info.file_path, "omar").await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        fx.service.delete(&info.file_path, "jane").await.unwrap();
        let result = fx.service.delete(&info.file_path, "jane").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
