use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

/// 文件系统网关trait
/// 所有磁盘访问都经过这一层，便于在测试中替换实现
#[async_trait]
pub trait FileSystemService: Send + Sync {
    /// 确保目录存在（不存在则递归创建）
    async fn ensure_directory(&self, path: &Path) -> Result<()>;

    /// 检查目录是否存在
    fn directory_exists(&self, path: &Path) -> bool;

    /// 读取文本文件，文件不存在时返回空字符串
    async fn read_text(&self, path: &Path) -> Result<String>;

    /// 写入文本文件（自动创建父目录）
    async fn write_text(&self, path: &Path, content: &str) -> Result<()>;

    /// 写入二进制文件（自动创建父目录）
    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// 检查文件是否存在
    async fn file_exists(&self, path: &Path) -> bool;

    /// 删除文件（不存在时静默成功）
    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// 递归删除目录
    async fn delete_directory(&self, path: &Path) -> Result<()>;

    /// 列出目录的直接子目录
    async fn list_subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// 递归列出目录下的所有文件
    fn list_files(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// 获取文件大小
    async fn file_size(&self, path: &Path) -> Result<u64>;

    /// 获取文件最后修改时间
    async fn modified_at(&self, path: &Path) -> Result<DateTime<Utc>>;

    /// 内容根目录
    fn content_dir(&self) -> &Path;

    /// 文章目录 Posts/
    fn posts_dir(&self) -> PathBuf {
        self.content_dir().join("Posts")
    }

    /// 媒体目录 Media/
    fn media_dir(&self) -> PathBuf {
        self.content_dir().join("Media")
    }

    /// 用户目录 Users/
    fn users_dir(&self) -> PathBuf {
        self.content_dir().join("Users")
    }
}

/// 本地文件系统实现
pub struct LocalFileSystemService {
    content_root: PathBuf,
}

impl LocalFileSystemService {
    pub fn new(content_root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&content_root)?;
        Ok(Self { content_root })
    }

    /// 初始化标准目录结构
    /// Posts/{Published,Drafts}、Media/、Users/
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_directory(&self.posts_dir()).await?;
        self.ensure_directory(&self.posts_dir().join("Published")).await?;
        self.ensure_directory(&self.posts_dir().join("Drafts")).await?;
        self.ensure_directory(&self.media_dir()).await?;
        self.ensure_directory(&self.users_dir()).await?;
        Ok(())
    }
}

#[async_trait]
impl FileSystemService for LocalFileSystemService {
    async fn ensure_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            info!("Creating directory: {}", path.display());
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    async fn read_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            warn!("File not found: {}", path.display());
            return Ok(String::new());
        }
        Ok(fs::read_to_string(path).await?)
    }

    async fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        Ok(())
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        Ok(())
    }

    async fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        if path.is_file() {
            fs::remove_file(path).await?;
            info!("File deleted: {}", path.display());
        }
        Ok(())
    }

    async fn delete_directory(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path).await?;
            info!("Directory deleted: {}", path.display());
        }
        Ok(())
    }

    async fn list_subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        if !path.is_dir() {
            return Ok(dirs);
        }

        let mut entries = fs::read_dir(path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }

    fn list_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            warn!("Directory not found: {}", path.display());
            return Ok(Vec::new());
        }

        let files = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        Ok(files)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path).await?;
        Ok(metadata.len())
    }

    async fn modified_at(&self, path: &Path) -> Result<DateTime<Utc>> {
        let metadata = fs::metadata(path).await?;
        Ok(DateTime::<Utc>::from(metadata.modified()?))
    }

    fn content_dir(&self) -> &Path {
        &self.content_root
    }
}
