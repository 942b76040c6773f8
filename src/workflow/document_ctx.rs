//! 文档处理上下文
//!
//! 封装"我正在处理哪个模板、要写到哪里"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 模板文件绝对路径
    pub template_path: PathBuf,

    /// 相对模板根目录的路径（使用 `/` 分隔），用于查找内容和日志
    pub relative_path: String,

    /// 输出文件路径
    pub output_path: PathBuf,

    /// 文档序号（从1开始，仅用于日志显示）
    pub index: usize,
}

impl DocumentCtx {
    /// 创建新的文档上下文
    pub fn new(
        template_path: PathBuf,
        relative_path: String,
        output_path: PathBuf,
        index: usize,
    ) -> Self {
        Self {
            template_path,
            relative_path,
            output_path,
            index,
        }
    }

    /// 是否为需要注入的 Word 文档
    pub fn is_docx(&self) -> bool {
        self.template_path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 #{} {}]", self.index, self.relative_path)
    }
}
