use crate::error::{AppResult, ConfigError};

/// 内容来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentSourceKind {
    /// 调用 LLM 实时生成
    Llm,
    /// 从预先准备好的 JSON / TOML 文件读取
    File,
}

impl ContentSourceKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "llm" => Some(Self::Llm),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 模板根目录
    pub template_root: String,
    /// 输出根目录（实际输出在 `<output_root>/<project_name>/` 下）
    pub output_root: String,
    /// 项目名称，同时用于替换路径中的 XX 占位符
    pub project_name: String,
    /// 项目背景描述
    pub project_description: String,
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 内容来源
    pub content_source: ContentSourceKind,
    /// 内容文件目录（`content_source = file` 时使用）
    pub content_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行报告文件名（位于项目输出目录下）
    pub report_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_root: "templates/template_backup".to_string(),
            output_root: "output".to_string(),
            project_name: "GeneratedProject".to_string(),
            project_description: String::new(),
            max_concurrent_documents: 2,
            content_source: ContentSourceKind::Llm,
            content_dir: "content".to_string(),
            verbose_logging: false,
            report_file: "injection_report.json".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();

        let content_source = match std::env::var("CONTENT_SOURCE") {
            Ok(value) => ContentSourceKind::parse(&value).ok_or(ConfigError::EnvVarParseFailed {
                var_name: "CONTENT_SOURCE".to_string(),
                value,
                expected_type: "llm | file".to_string(),
            })?,
            Err(_) => default.content_source,
        };

        Ok(Self {
            template_root: std::env::var("TEMPLATE_ROOT").unwrap_or(default.template_root),
            output_root: std::env::var("OUTPUT_ROOT").unwrap_or(default.output_root),
            project_name: std::env::var("PROJECT_NAME").unwrap_or(default.project_name),
            project_description: std::env::var("PROJECT_DESCRIPTION")
                .unwrap_or(default.project_description),
            max_concurrent_documents: std::env::var("MAX_CONCURRENT_DOCUMENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default.max_concurrent_documents),
            content_source,
            content_dir: std::env::var("CONTENT_DIR").unwrap_or(default.content_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
            report_file: std::env::var("REPORT_FILE").unwrap_or(default.report_file),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        })
    }

    /// 检查所选内容来源需要的配置是否齐全
    ///
    /// LLM 模式下没有 API Key 时每个文档都会调用失败，启动时直接报错。
    pub fn validate(&self) -> AppResult<()> {
        if self.content_source == ContentSourceKind::Llm && self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                var_name: "LLM_API_KEY".to_string(),
                hint: "离线运行请使用 CONTENT_SOURCE=file".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
