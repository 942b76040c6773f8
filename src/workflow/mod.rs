pub mod document_ctx;
pub mod document_flow;

pub use document_ctx::DocumentCtx;
pub use document_flow::{DocumentFlow, ProcessResult, SkipReason};
