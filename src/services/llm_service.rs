//! LLM 内容生成 - 业务能力层
//!
//! 只负责"根据章节标题写内容"，不关心内容如何注入
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};
use crate::models::{ContentMap, GenerationRequest};
use crate::services::content_source::ContentSource;
use crate::utils::logging::truncate_text;

/// 参考原文的最大长度（字符）
const PREVIEW_CHARS: usize = 500;

const SYSTEM_MESSAGE: &str = "你是一个专业的项目文档编写助手。";

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 为单个文档的全部章节生成内容
/// - 提供通用的 LLM 调用接口
/// - 不读写文件，不关心注入位置
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已 trim）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e.to_string())
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl ContentSource for LlmService {
    async fn generate(&self, request: &GenerationRequest) -> Result<ContentMap> {
        debug!(
            "开始生成内容，章节数量: {}, 模型: {}",
            request.headers.len(),
            self.model_name
        );

        let prompt = build_document_prompt(request);
        let response = self.send_to_llm(&prompt, Some(SYSTEM_MESSAGE)).await?;

        Ok(parse_content_response(&response))
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// 构建文档内容生成提示词
pub fn build_document_prompt(request: &GenerationRequest) -> String {
    let header_list = request
        .headers
        .iter()
        .map(|h| format!("- {}", h))
        .collect::<Vec<_>>()
        .join("\n");

    let preview: String = request.text_preview.chars().take(PREVIEW_CHARS).collect();

    format!(
        r#"请根据以下章节标题列表，结合项目背景"{description}"，为项目"{name}"编写对应的内容。
请返回一个 JSON 对象，Key 是章节标题（必须完全匹配），Value 是对应的内容。

要求：
1. **不要** 在 Value 内容中重复包含 Key（标题）本身。
2. **不要** 生成章节目录（TOC）。
3. **不要** 使用 Markdown 列表格式（如 "- " 或 "* "）来分段。请使用常规的段落文本，段落之间用换行符分隔。
4. 内容应专业、详实，符合项目文档规范。

章节列表:
{headers}

参考语境（原文档内容，仅供参考风格，请重新生成）：
{preview}...

请只返回纯 JSON 格式的数据，不要包含 markdown 代码块标记，不要包含其他解释文字。"#,
        description = request.project.project_description,
        name = request.project.project_name,
        headers = header_list,
        preview = preview,
    )
}

/// 解析 LLM 返回的内容映射
///
/// 容忍 ```json 代码块和前后多余文字；无法解析时返回空映射。
pub fn parse_content_response(response: &str) -> ContentMap {
    let cleaned = response.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    // 截取最外层的 JSON 对象
    let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    };

    match serde_json::from_str::<ContentMap>(candidate) {
        Ok(map) => map,
        Err(e) => {
            warn!(
                "JSON 解析失败，返回空内容: {} (响应: {})",
                e,
                truncate_text(response, 80)
            );
            ContentMap::new()
        }
    }
}
