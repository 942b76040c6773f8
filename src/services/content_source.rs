//! 内容来源 - 业务能力层
//!
//! 注入引擎只认 `ContentMap`，至于内容是 LLM 现写的还是提前准备好的文件，
//! 由这里的实现决定。

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::FileError;
use crate::models::{ContentMap, GenerationRequest};

/// 内容生成方
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// 为请求中的标题生成内容映射
    ///
    /// 返回空映射表示"没有可注入的内容"，调用方应跳过注入。
    async fn generate(&self, request: &GenerationRequest) -> Result<ContentMap>;

    /// 来源名称（仅用于日志）
    fn name(&self) -> &str;
}

/// 从内容文件读取
///
/// 模板 `设计/概要设计.docx` 对应 `<dir>/设计/概要设计.json`（或 `.toml`）。
pub struct FileContentSource {
    dir: PathBuf,
}

impl FileContentSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 按优先级返回候选内容文件
    fn candidates(&self, relative_path: &str) -> [PathBuf; 2] {
        let base = self.dir.join(relative_path);
        [base.with_extension("json"), base.with_extension("toml")]
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn generate(&self, request: &GenerationRequest) -> Result<ContentMap> {
        for path in self.candidates(&request.relative_path) {
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            debug!("读取内容文件: {}", path.display());
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("无法读取内容文件: {}", path.display()))?;
            return Ok(parse_content_file(&path, &text)?);
        }

        warn!("⚠️ 未找到内容文件: {}", request.relative_path);
        Ok(ContentMap::new())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// 按扩展名解析内容文件
pub fn parse_content_file(path: &Path, text: &str) -> std::result::Result<ContentMap, FileError> {
    let parse_failed = |message: String| FileError::ContentParseFailed {
        path: path.display().to_string(),
        message,
    };

    match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(text).map_err(|e| parse_failed(e.to_string())),
        _ => serde_json::from_str(text).map_err(|e| parse_failed(e.to_string())),
    }
}
