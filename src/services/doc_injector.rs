//! 文档注入 - 业务能力层
//!
//! 把容器读写、标题识别、段落流匹配组合成两个能力：
//! - `read_template`：从模板中读出纯文本和标题候选
//! - `inject`：用内容映射重写模板，得到新的压缩包
//!
//! 只处理单个文档，不关心文档从哪来、写到哪去。

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::DocxPackage;
use crate::models::ContentMap;
use crate::services::header_extractor::extract_headers;
use crate::services::markup::extract_plain_text;
use crate::services::paragraph_matcher::rewrite_document_xml;

/// 模板读取结果
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    /// 文档纯文本，每段一行
    pub text: String,
    /// 标题候选，空表示未识别到章节
    pub headers: Vec<String>,
}

/// 注入统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionStats {
    pub matched_keys: Vec<String>,
    pub unused_keys: Vec<String>,
    pub dropped_paragraphs: usize,
    pub toc_stops: usize,
}

/// 注入结果：新的压缩包 + 统计
#[derive(Debug, Clone)]
pub struct Injection {
    pub package: DocxPackage,
    pub stats: InjectionStats,
}

/// 读取模板文本和标题候选
pub fn read_template(bytes: &[u8]) -> AppResult<TemplateInfo> {
    let package = DocxPackage::from_bytes(bytes)?;
    let xml = package.document_xml()?;
    let text = extract_plain_text(&xml);
    let headers = extract_headers(&text);
    Ok(TemplateInfo { text, headers })
}

/// 用内容映射重写模板
///
/// 主标记部件缺失时直接失败，不产生任何输出。
pub fn inject(bytes: &[u8], content: &ContentMap) -> AppResult<Injection> {
    let package = DocxPackage::from_bytes(bytes)?;
    let xml = package.document_xml()?;

    let outcome = rewrite_document_xml(&xml, content);
    let unused_keys = outcome
        .unused_keys(content)
        .into_iter()
        .map(str::to_string)
        .collect();

    let stats = InjectionStats {
        matched_keys: outcome.matched_keys,
        unused_keys,
        dropped_paragraphs: outcome.dropped_paragraphs,
        toc_stops: outcome.toc_stops,
    };

    Ok(Injection {
        package: package.with_document_xml(outcome.xml)?,
        stats,
    })
}

/// 读取源文件、注入并写出到目标路径
///
/// 源文件从不被修改；同一源文件和内容映射重复执行得到相同的输出。
pub async fn inject_file(
    source: &Path,
    output: &Path,
    content: &ContentMap,
) -> AppResult<InjectionStats> {
    let bytes = tokio::fs::read(source)
        .await
        .map_err(|e| AppError::file_read_failed(source.display().to_string(), e))?;

    let injection = inject(&bytes, content)?;
    injection.package.write_to(output).await?;

    info!("💉 已注入并替换内容: {}", output.display());
    Ok(injection.stats)
}
