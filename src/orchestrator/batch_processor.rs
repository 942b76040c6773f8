//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量模板的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：选择内容来源、创建模板缓存
//! 2. **批量扫描**：递归列出模板目录下的所有文件
//! 3. **并发控制**：使用 Semaphore 限制同时处理的文档数量
//! 4. **失败隔离**：单个文档失败只记入报告，不影响其他文档
//! 5. **全局统计**：汇总结果并写出 JSON 运行报告

use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::{Config, ContentSourceKind};
use crate::infrastructure::{write_atomically, TemplateCache};
use crate::models::ProjectData;
use crate::orchestrator::directory_scanner::{
    output_path_for, sanitize_project_name, scan_templates,
};
use crate::services::{ContentSource, FileContentSource, LlmService};
use crate::utils::logging::{log_documents_found, log_startup, print_final_stats};
use crate::workflow::{DocumentCtx, DocumentFlow, ProcessResult};

/// 单个文档在报告中的记录
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub index: usize,
    pub relative_path: String,
    pub output_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 运行报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub project_name: String,
    pub generated_at: String,
    pub total: usize,
    pub injected: usize,
    pub skipped: usize,
    pub copied: usize,
    pub failed: usize,
    pub documents: Vec<DocumentReport>,
}

impl RunReport {
    fn record(&mut self, document: DocumentReport) {
        match &document.result {
            Some(ProcessResult::Injected { .. }) => self.injected += 1,
            Some(ProcessResult::Skipped { .. }) => self.skipped += 1,
            Some(ProcessResult::Copied) => self.copied += 1,
            None => self.failed += 1,
        }
        self.documents.push(document);
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<DocumentFlow>,
    cache: Arc<TemplateCache>,
}

impl App {
    /// 初始化应用，按配置选择内容来源
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        log_startup(
            &config.template_root,
            &config.output_root,
            config.max_concurrent_documents,
        );

        let source: Arc<dyn ContentSource> = match config.content_source {
            ContentSourceKind::Llm => Arc::new(LlmService::new(&config)),
            ContentSourceKind::File => Arc::new(FileContentSource::new(&config.content_dir)),
        };
        info!("📝 内容来源: {}", source.name());

        Ok(Self::with_source(config, source))
    }

    /// 使用指定的内容来源创建应用
    pub fn with_source(config: Config, source: Arc<dyn ContentSource>) -> Self {
        let cache = Arc::new(TemplateCache::new());
        let flow = DocumentFlow::new(
            Arc::clone(&cache),
            source,
            ProjectData::from_config(&config),
        );
        Self {
            config,
            flow: Arc::new(flow),
            cache,
        }
    }

    /// 模板缓存，供外部在模板变更时使其失效
    pub fn template_cache(&self) -> Arc<TemplateCache> {
        Arc::clone(&self.cache)
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunReport> {
        info!("\n📁 正在扫描模板目录...");
        let templates = scan_templates(Path::new(&self.config.template_root)).await?;

        let mut report = RunReport {
            project_name: self.config.project_name.clone(),
            generated_at: chrono::Local::now().to_rfc3339(),
            total: templates.len(),
            ..Default::default()
        };

        if templates.is_empty() {
            warn!("⚠️ 模板目录中没有文件，程序结束");
            return Ok(report);
        }

        log_documents_found(templates.len());

        let output_root = Path::new(&self.config.output_root);
        let contexts: Vec<DocumentCtx> = templates
            .into_iter()
            .enumerate()
            .map(|(i, template)| {
                let output_path = output_path_for(
                    output_root,
                    &self.config.project_name,
                    &template.relative_path,
                );
                DocumentCtx::new(template.path, template.relative_path, output_path, i + 1)
            })
            .collect();

        for document in self.process_all(contexts).await? {
            report.record(document);
        }

        let report_path = self.report_path();
        write_report(&report_path, &report).await?;

        print_final_stats(
            report.injected,
            report.skipped + report.copied,
            report.failed,
            &report_path.display().to_string(),
        );

        Ok(report)
    }

    /// 并发处理所有文档，结果按文档序号排列
    async fn process_all(&self, contexts: Vec<DocumentCtx>) -> Result<Vec<DocumentReport>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents.max(1)));
        let mut handles = Vec::with_capacity(contexts.len());

        for ctx in contexts {
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = Arc::clone(&self.flow);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome = flow.run(&ctx).await;
                if let Err(e) = &outcome {
                    error!("{} ❌ 处理过程中发生错误: {:#}", ctx, e);
                }
                DocumentReport {
                    index: ctx.index,
                    relative_path: ctx.relative_path,
                    output_path: ctx.output_path.display().to_string(),
                    error: outcome.as_ref().err().map(|e| format!("{:#}", e)),
                    result: outcome.ok(),
                }
            }));
        }

        let mut documents = Vec::with_capacity(handles.len());
        for (i, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(document) => documents.push(document),
                Err(e) => {
                    error!("[文档 #{}] 任务执行失败: {}", i + 1, e);
                    documents.push(DocumentReport {
                        index: i + 1,
                        relative_path: String::new(),
                        output_path: String::new(),
                        result: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(documents)
    }

    /// 报告位于项目输出目录下
    fn report_path(&self) -> PathBuf {
        Path::new(&self.config.output_root)
            .join(sanitize_project_name(&self.config.project_name))
            .join(&self.config.report_file)
    }
}

async fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_vec_pretty(report).context("序列化运行报告失败")?;
    write_atomically(path, &json).await?;
    Ok(())
}
