use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fs::FileSystemService;

/// 元数据编解码器
/// 负责JSON侧车文件的读写和各类元数据文件的路径解析
pub struct MetadataStore {
    fs: Arc<dyn FileSystemService>,
}

impl MetadataStore {
    pub fn new(fs: Arc<dyn FileSystemService>) -> Self {
        Self { fs }
    }

    /// 读取元数据文件，文件不存在时返回None
    pub async fn read_metadata<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !self.fs.file_exists(path).await {
            return Ok(None);
        }

        let json = self.fs.read_text(path).await?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// 将元数据序列化为带缩进的JSON并写入
    pub async fn write_metadata<T: Serialize>(&self, path: &Path, metadata: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(metadata)?;
        self.fs.write_text(path, &json).await
    }

    /// 文章元数据文件路径
    pub fn post_metadata_path(&self, post_directory: &Path) -> PathBuf {
        post_directory.join("meta.json")
    }

    /// 站点元数据文件路径
    pub fn site_metadata_path(&self) -> PathBuf {
        self.fs.content_dir().join("site.json")
    }

    /// 分类元数据文件路径
    pub fn category_metadata_path(&self, category_slug: &str) -> PathBuf {
        self.fs
            .content_dir()
            .join("categories")
            .join(format!("{}.json", category_slug))
    }

    /// 标签元数据文件路径
    pub fn tag_metadata_path(&self, tag_slug: &str) -> PathBuf {
        self.fs
            .content_dir()
            .join("tags")
            .join(format!("{}.json", tag_slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystemService;
    use quill_domain::SiteMetadata;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> MetadataStore {
        let fs = Arc::new(LocalFileSystemService::new(dir.path().to_path_buf()).unwrap());
        MetadataStore::new(fs)
    }

    #[tokio::test]
    async fn test_missing_metadata_yields_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let site: Option<SiteMetadata> = store
            .read_metadata(&store.site_metadata_path())
            .await
            .unwrap();
        assert!(site.is_none());
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store.site_metadata_path();

        let mut site = SiteMetadata::default();
        site.all_tags.push("rust".to_string());
        store.write_metadata(&path, &site).await.unwrap();

        let loaded: SiteMetadata = store.read_metadata(&path).await.unwrap().unwrap();
        assert_eq!(loaded.all_tags, vec!["rust"]);
        assert_eq!(loaded.posts_per_page, 10);
    }
}
