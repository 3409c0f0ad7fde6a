use anyhow::Result;
use quill_domain::RedirectEntry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::fs::FileSystemService;

/// 重定向台账
/// 内存映射 + redirects.json持久化，每次变更立即落盘
/// 必须显式调用load()完成初始加载
pub struct RedirectStore {
    fs: Arc<dyn FileSystemService>,
    redirects_path: PathBuf,
    redirects: RwLock<HashMap<String, RedirectEntry>>,
}

impl RedirectStore {
    pub fn new(fs: Arc<dyn FileSystemService>) -> Self {
        let redirects_path = fs.content_dir().join("redirects.json");
        Self {
            fs,
            redirects_path,
            redirects: RwLock::new(HashMap::new()),
        }
    }

    /// 从redirects.json加载全部重定向条目
    /// 文件缺失或损坏时以空映射启动
    pub async fn load(&self) -> Result<()> {
        if !self.fs.file_exists(&self.redirects_path).await {
            return Ok(());
        }

        let json = self.fs.read_text(&self.redirects_path).await?;
        match serde_json::from_str::<HashMap<String, RedirectEntry>>(&json) {
            Ok(loaded) => {
                info!("Loaded {} redirects", loaded.len());
                *self.redirects.write().await = loaded;
            }
            Err(e) => {
                error!("Error loading redirects: {}", e);
            }
        }
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let redirects = self.redirects.read().await;
        let json = serde_json::to_string_pretty(&*redirects)?;
        self.fs.write_text(&self.redirects_path, &json).await
    }

    /// 新增或替换一条重定向并立即持久化
    pub async fn add(&self, old_path: &str, new_path: &str, status_code: u16) -> Result<()> {
        let old_path = normalize_path(old_path);
        let new_path = normalize_path(new_path);

        self.redirects
            .write()
            .await
            .insert(old_path, RedirectEntry::new(new_path, status_code));
        self.save().await
    }

    /// 移除一条重定向，存在时持久化
    pub async fn remove(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);

        let removed = self.redirects.write().await.remove(&path).is_some();
        if removed {
            self.save().await?;
        }
        Ok(())
    }

    /// 按规范化路径查找重定向
    pub async fn lookup(&self, path: &str) -> Option<RedirectEntry> {
        let path = normalize_path(path);
        self.redirects.read().await.get(&path).cloned()
    }
}

/// 路径规范化：去掉前导斜杠并转小写
fn normalize_path(path: &str) -> String {
    path.trim_start_matches('/').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystemService;
    use tempfile::TempDir;

    fn fs(dir: &TempDir) -> Arc<dyn FileSystemService> {
        Arc::new(LocalFileSystemService::new(dir.path().to_path_buf()).unwrap())
    }

    #[tokio::test]
    async fn test_lookup_normalizes_path() {
        let dir = TempDir::new().unwrap();
        let store = RedirectStore::new(fs(&dir));
        store.load().await.unwrap();

        store.add("blog/old", "blog/new", 301).await.unwrap();

        let entry = store.lookup("/Blog/Old").await.unwrap();
        assert_eq!(entry.new_url, "blog/new");
        assert_eq!(entry.status_code, 301);
    }

    #[tokio::test]
    async fn test_redirects_survive_reload() {
        let dir = TempDir::new().unwrap();
        let fs = fs(&dir);

        let store = RedirectStore::new(fs.clone());
        store.load().await.unwrap();
        store.add("/blog/a", "blog/b", 302).await.unwrap();

        let reloaded = RedirectStore::new(fs);
        reloaded.load().await.unwrap();

        let entry = reloaded.lookup("blog/a").await.unwrap();
        assert_eq!(entry.new_url, "blog/b");
        assert_eq!(entry.status_code, 302);
    }

    #[tokio::test]
    async fn test_remove_deletes_entry() {
        let dir = TempDir::new().unwrap();
        let store = RedirectStore::new(fs(&dir));
        store.load().await.unwrap();

        store.add("blog/old", "blog/new", 301).await.unwrap();
        store.remove("BLOG/OLD").await.unwrap();

        assert!(store.lookup("blog/old").await.is_none());
    }
}
