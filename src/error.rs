use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档容器 / 标记相关错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 文档容器 / 标记相关错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 容器中缺少主标记部件（word/document.xml）
    #[error("无效的 DOCX: 缺少 {part}")]
    MissingPrimaryPart { part: String },
    /// 主标记部件不是合法的 UTF-8 文本
    #[error("{part} 不是合法的 UTF-8 文本")]
    InvalidEncoding {
        part: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// 读取压缩包失败
    #[error("读取压缩包失败: {source}")]
    ArchiveReadFailed {
        #[source]
        source: zip::result::ZipError,
    },
    /// 写入压缩包失败
    #[error("写入压缩包失败: {source}")]
    ArchiveWriteFailed {
        #[source]
        source: zip::result::ZipError,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 内容文件解析失败
    #[error("内容文件解析失败 ({path}): {message}")]
    ContentParseFailed { path: String, message: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必需的配置项缺失
    #[error("缺少必需的配置 {var_name}: {hint}")]
    MissingValue { var_name: String, hint: String },
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Document(DocumentError::ArchiveReadFailed { source: err })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺少主标记部件错误
    pub fn missing_primary_part(part: impl Into<String>) -> Self {
        AppError::Document(DocumentError::MissingPrimaryPart { part: part.into() })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(model: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            message: message.into(),
        })
    }

    /// 是否为输入文档本身损坏（不可重试）
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            AppError::Document(
                DocumentError::MissingPrimaryPart { .. }
                    | DocumentError::InvalidEncoding { .. }
                    | DocumentError::ArchiveReadFailed { .. }
            )
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_part_is_malformed_input() {
        let err = AppError::missing_primary_part("word/document.xml");
        assert!(err.is_malformed_input());
        assert_eq!(
            err.to_string(),
            "文档错误: 无效的 DOCX: 缺少 word/document.xml"
        );
    }

    #[test]
    fn test_write_failure_is_not_malformed_input() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::file_write_failed("out/a.docx", io);
        assert!(!err.is_malformed_input());
    }
}
