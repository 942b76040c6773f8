//! 内容块序列化
//!
//! 把生成的多行文本转换成可直接拼进标记流的段落片段。
//! Markdown 列表符号被去掉（只输出普通段落），`## ` / `### ` 转为对应标题样式。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::services::markup::escape_xml;

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s+").expect("invalid bullet regex"));

/// 注入段落使用的样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Normal,
    Heading2,
    Heading3,
}

impl ParagraphStyle {
    pub fn style_id(self) -> &'static str {
        match self {
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::Heading2 => "Heading2",
            ParagraphStyle::Heading3 => "Heading3",
        }
    }
}

/// 解析后的单行内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub style: ParagraphStyle,
    pub text: String,
}

/// 解析内容块，空行被丢弃
pub fn parse_content(content: &str) -> Vec<ContentLine> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> ContentLine {
    if let Some(rest) = line.strip_prefix("### ") {
        return ContentLine {
            style: ParagraphStyle::Heading3,
            text: rest.trim().to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return ContentLine {
            style: ParagraphStyle::Heading2,
            text: rest.trim().to_string(),
        };
    }
    ContentLine {
        style: ParagraphStyle::Normal,
        text: BULLET_RE.replace(line, "").into_owned(),
    }
}

/// 单个段落的标记
pub fn paragraph_xml(line: &ContentLine) -> String {
    format!(
        concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#
        ),
        line.style.style_id(),
        escape_xml(&line.text)
    )
}

/// 序列化整个内容块
pub fn serialize_content(content: &str) -> String {
    parse_content(content).iter().map(paragraph_xml).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_lines_are_dropped() {
        let lines = parse_content("第一段\n\n   \r\n第二段\r\n");
        assert_eq!(
            lines,
            vec![
                ContentLine { style: ParagraphStyle::Normal, text: "第一段".to_string() },
                ContentLine { style: ParagraphStyle::Normal, text: "第二段".to_string() },
            ]
        );
    }

    #[test]
    fn test_bullets_become_plain_paragraphs() {
        let lines = parse_content("- 需求分析\n* 方案设计\n-不是列表");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["需求分析", "方案设计", "-不是列表"]);
        assert!(lines.iter().all(|l| l.style == ParagraphStyle::Normal));
    }

    #[test]
    fn test_heading_markers() {
        let lines = parse_content("## 总体设计\n### 模块划分\n#### 更深");
        assert_eq!(lines[0].style, ParagraphStyle::Heading2);
        assert_eq!(lines[0].text, "总体设计");
        assert_eq!(lines[1].style, ParagraphStyle::Heading3);
        assert_eq!(lines[1].text, "模块划分");
        assert_eq!(lines[2].style, ParagraphStyle::Normal);
        assert_eq!(lines[2].text, "#### 更深");
    }

    #[test]
    fn test_serialize_escapes_text() {
        let xml = serialize_content("A < B & \"C\"");
        assert_eq!(
            xml,
            concat!(
                r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr>"#,
                r#"<w:r><w:t xml:space="preserve">A &lt; B &amp; &quot;C&quot;</w:t></w:r></w:p>"#
            )
        );
    }

    #[test]
    fn test_empty_content_serializes_to_nothing() {
        assert_eq!(serialize_content("\n\n"), "");
    }
}
