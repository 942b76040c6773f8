//! 业务能力层（Services）
//!
//! 每个模块只描述"我能做什么"，只处理单个文档

pub mod content_serializer;
pub mod content_source;
pub mod doc_injector;
pub mod essence;
pub mod header_extractor;
pub mod llm_service;
pub mod markup;
pub mod paragraph_matcher;

pub use content_source::{ContentSource, FileContentSource};
pub use doc_injector::{inject, inject_file, read_template, Injection, InjectionStats, TemplateInfo};
pub use essence::essence;
pub use header_extractor::extract_headers;
pub use llm_service::LlmService;
pub use paragraph_matcher::{rewrite_document_xml, MatchState, ParagraphMatcher, RewriteOutcome};
