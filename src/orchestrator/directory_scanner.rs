//! 模板目录扫描
//!
//! 递归列出模板根目录下的所有文件，并计算每个文件的输出位置。

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{AppError, FileError};

/// 文件名中的项目占位符（不区分大小写），长的写法优先
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)xxx项目|xx项目|xx").expect("invalid placeholder regex"));

/// 文件系统不允许的字符
static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("invalid unsafe chars regex"));

/// 扫描到的模板文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    /// 相对模板根目录的路径，统一使用 `/` 分隔
    pub relative_path: String,
}

/// 递归扫描模板目录
///
/// 忽略以 `.` 开头的隐藏项和 Word 的 `~$` 锁文件，结果按相对路径排序。
pub async fn scan_templates(root: &Path) -> Result<Vec<TemplateFile>> {
    if !fs::try_exists(root).await.unwrap_or(false) {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: root.display().to_string(),
        })
        .into());
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("无法读取文件夹: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if is_ignored(&name) {
                continue;
            }

            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }

            let relative_path = relative_slash_path(root, &path);
            files.push(TemplateFile {
                path,
                relative_path,
            });
        }
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

/// 隐藏文件和 Word 临时锁文件
fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name.starts_with("~$")
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// 项目名中的非法路径字符替换为 `_`
pub fn sanitize_project_name(project_name: &str) -> String {
    UNSAFE_CHARS_RE.replace_all(project_name, "_").into_owned()
}

/// 把相对路径中的项目占位符替换为项目名
///
/// `xxx项目`、`xx项目`、`xx` 整体替换为项目名：
/// `xx项目建议书.docx` + `智慧园区` → `智慧园区建议书.docx`。
/// 替换后出现的"项目项目"合并为"项目"。
pub fn resolve_output_relative_path(relative_path: &str, project_name: &str) -> String {
    let name = sanitize_project_name(project_name);
    let replaced = PLACEHOLDER_RE.replace_all(relative_path, regex::NoExpand(&name));
    replaced.replace("项目项目", "项目")
}

/// 输出路径：`<output_root>/<project>/<替换占位符后的相对路径>`
pub fn output_path_for(output_root: &Path, project_name: &str, relative_path: &str) -> PathBuf {
    let mut path = output_root.join(sanitize_project_name(project_name));
    for part in resolve_output_relative_path(relative_path, project_name).split('/') {
        path.push(part);
    }
    path
}
