//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一份模板"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取模板（经由缓存）→ 非 DOCX 原样复制
//! 2. 提取标题 → 无标题原样复制
//! 3. 内容来源生成映射 → 空映射原样复制
//! 4. 注入 → 原子写出

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::infrastructure::{write_atomically, TemplateCache};
use crate::models::{GenerationRequest, ProjectData};
use crate::services::{inject, read_template, ContentSource, InjectionStats};
use crate::workflow::document_ctx::DocumentCtx;

/// 跳过注入的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 模板中没有识别到任何标题
    NoHeaders,
    /// 内容来源没有给出任何内容
    EmptyContent,
}

/// 文档处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessResult {
    /// 已注入
    Injected { stats: InjectionStats },
    /// 跳过注入，模板原样写出
    Skipped { reason: SkipReason },
    /// 非 DOCX 文件，原样复制
    Copied,
}

/// 文档处理流程
///
/// - 编排单份模板的读取、生成、注入、写出
/// - 模板字节和内容来源都由外部注入
/// - 源模板从不被修改
pub struct DocumentFlow {
    cache: Arc<TemplateCache>,
    source: Arc<dyn ContentSource>,
    project: ProjectData,
}

impl DocumentFlow {
    pub fn new(
        cache: Arc<TemplateCache>,
        source: Arc<dyn ContentSource>,
        project: ProjectData,
    ) -> Self {
        Self {
            cache,
            source,
            project,
        }
    }

    pub async fn run(&self, ctx: &DocumentCtx) -> Result<ProcessResult> {
        let bytes = self
            .cache
            .get_or_load(&ctx.template_path)
            .await
            .with_context(|| format!("{} 读取模板失败", ctx))?;

        if !ctx.is_docx() {
            write_atomically(&ctx.output_path, &bytes).await?;
            debug!("{} 📄 非 DOCX 文件，已复制", ctx);
            return Ok(ProcessResult::Copied);
        }

        let template = read_template(&bytes).with_context(|| format!("{} 解析模板失败", ctx))?;

        if template.headers.is_empty() {
            warn!("{} ⚠️ 未识别到任何标题，跳过注入", ctx);
            write_atomically(&ctx.output_path, &bytes).await?;
            return Ok(ProcessResult::Skipped {
                reason: SkipReason::NoHeaders,
            });
        }

        info!("{} 📑 识别到 {} 个标题", ctx, template.headers.len());
        debug!("{} 标题: {:?}", ctx, template.headers);

        let request = GenerationRequest {
            relative_path: ctx.relative_path.clone(),
            headers: template.headers,
            text_preview: template.text,
            project: self.project.clone(),
        };

        info!("{} 🤖 正在通过 {} 生成内容...", ctx, self.source.name());
        let content = self
            .source
            .generate(&request)
            .await
            .with_context(|| format!("{} 内容生成失败", ctx))?;

        if content.is_empty() {
            warn!("{} ⚠️ 内容为空，跳过注入", ctx);
            write_atomically(&ctx.output_path, &bytes).await?;
            return Ok(ProcessResult::Skipped {
                reason: SkipReason::EmptyContent,
            });
        }

        let injection = inject(&bytes, &content).with_context(|| format!("{} 注入失败", ctx))?;

        for key in &injection.stats.unused_keys {
            warn!("{} ⚠️ 内容键未匹配到任何标题: {}", ctx, key);
        }

        injection.package.write_to(&ctx.output_path).await?;

        info!(
            "{} ✅ 已注入 {} 个章节，写出到 {}",
            ctx,
            injection.stats.matched_keys.len(),
            ctx.output_path.display()
        );

        Ok(ProcessResult::Injected {
            stats: injection.stats,
        })
    }
}
