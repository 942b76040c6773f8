//! 模板字节缓存
//!
//! 显式的缓存对象，按源路径缓存模板文件内容，由编排层通过 `Arc` 注入到
//! 每个文档任务中。文件监听等外部协作者通过 [`TemplateCache::invalidate`] 使其失效。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<PathBuf, Arc<Vec<u8>>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读穿缓存：命中直接返回，否则读取文件并缓存
    pub async fn get_or_load(&self, path: &Path) -> AppResult<Arc<Vec<u8>>> {
        if let Some(bytes) = self.entries.read().await.get(path) {
            debug!("模板缓存命中: {}", path.display());
            return Ok(Arc::clone(bytes));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let bytes = Arc::new(bytes);

        let mut entries = self.entries.write().await;
        // 并发加载同一路径时保留先写入的那份
        let cached = entries
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::clone(&bytes));
        Ok(Arc::clone(cached))
    }

    /// 使单个路径失效，返回是否存在该条目
    pub async fn invalidate(&self, path: &Path) -> bool {
        let removed = self.entries.write().await.remove(path).is_some();
        if removed {
            debug!("已清除模板缓存: {}", path.display());
        }
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_through_and_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.docx");
        std::fs::write(&path, b"v1").unwrap();

        let cache = TemplateCache::new();
        assert_eq!(cache.get_or_load(&path).await.unwrap().as_slice(), b"v1");

        // 缓存命中时不会看到磁盘上的新内容
        std::fs::write(&path, b"v2").unwrap();
        assert_eq!(cache.get_or_load(&path).await.unwrap().as_slice(), b"v1");
        assert_eq!(cache.len().await, 1);

        assert!(cache.invalidate(&path).await);
        assert!(!cache.invalidate(&path).await);
        assert_eq!(cache.get_or_load(&path).await.unwrap().as_slice(), b"v2");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TemplateCache::new();

        let result = cache.get_or_load(&dir.path().join("missing.docx")).await;

        assert!(result.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.docx");
        std::fs::write(&path, b"x").unwrap();
        let cache = TemplateCache::new();
        cache.get_or_load(&path).await.unwrap();

        cache.clear().await;

        assert!(cache.is_empty().await);
    }
}
