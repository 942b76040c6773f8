//! # Doc Injector
//!
//! 按章节标题向 Word 模板注入内容，保留模板原有的样式和版式
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文件和压缩包，只暴露能力
//! - `DocxPackage` - DOCX 容器读写，只替换主标记部件
//! - `TemplateCache` - 显式注入的模板字节缓存
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档
//! - `header_extractor` - 从纯文本中猜出章节标题
//! - `paragraph_matcher` - 段落流状态机，定位标题并替换正文
//! - `content_serializer` - 把内容文本转成带样式的段落
//! - `ContentSource` - 内容来源（LLM / 内容文件）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份模板"的完整处理流程
//! - `DocumentCtx` - 上下文封装（模板路径 + 输出路径）
//! - `DocumentFlow` - 流程编排（读取 → 识别 → 生成 → 注入 → 写出）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/directory_scanner` - 模板扫描和输出路径计算
//! - `orchestrator/batch_processor` - 批量处理器，管理并发和运行报告
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, ContentSourceKind};
pub use error::{AppError, AppResult};
pub use infrastructure::{DocxPackage, TemplateCache};
pub use models::{ContentMap, GenerationRequest, ProjectData};
pub use orchestrator::{App, RunReport};
pub use services::{inject, inject_file, read_template, rewrite_document_xml, ContentSource};
pub use workflow::{DocumentCtx, DocumentFlow, ProcessResult, SkipReason};
