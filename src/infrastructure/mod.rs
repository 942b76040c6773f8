//! 基础设施层
//!
//! 持有文件 / 压缩包这类资源，只向上层暴露能力

pub mod docx_package;
pub mod template_cache;

pub use docx_package::{write_atomically, DocxPackage, DOCUMENT_PART};
pub use template_cache::TemplateCache;
