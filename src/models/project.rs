use serde::{Deserialize, Serialize};

use crate::config::Config;

/// 项目基本信息，用于提示词和输出路径
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectData {
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
}

impl ProjectData {
    pub fn from_config(config: &Config) -> Self {
        Self {
            project_name: config.project_name.clone(),
            project_description: config.project_description.clone(),
        }
    }
}

/// 一次内容生成请求
///
/// 只描述"要为哪些标题生成内容"，不关心内容最终如何注入
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 模板相对路径（使用 `/` 分隔）
    pub relative_path: String,
    /// 从模板中识别出的章节标题
    pub headers: Vec<String>,
    /// 模板原文，仅作为风格参考
    pub text_preview: String,
    pub project: ProjectData,
}
