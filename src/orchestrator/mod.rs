//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `directory_scanner` - 模板扫描
//! - 递归列出模板文件，忽略隐藏项
//! - 计算输出路径，替换项目占位符
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息和运行报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<TemplateFile>)
//!     ↓
//! workflow::DocumentFlow (处理单个文档)
//!     ↓
//! services (能力层：标题识别 / 内容生成 / 注入)
//!     ↓
//! infrastructure (基础设施：DocxPackage / TemplateCache)
//! ```

pub mod batch_processor;
pub mod directory_scanner;

// 重新导出主要类型
pub use batch_processor::{App, DocumentReport, RunReport};
pub use directory_scanner::{resolve_output_relative_path, scan_templates, TemplateFile};
