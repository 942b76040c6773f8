//! 段落级标记流
//!
//! 不建立文档对象树，只把 `word/document.xml` 切成"段落 / 非段落"交替的线性
//! 标记序列，并提供段落可见文本、纯文本导出、目录段落识别等纯函数。

use once_cell::sync::Lazy;
use regex::Regex;

/// `<w:p ...>` 到下一个 `</w:p>` 之间的最短片段
///
/// `<w:pPr>` 和自闭合的 `<w:p/>`、`<w:p w:rsidR="..."/>` 都不算段落，
/// 否则开标签会一直吞到后一个段落的 `</w:p>`。
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:>|\s(?:[^>]*[^/>])?>).*?</w:p>").expect("invalid paragraph regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid tag regex"));

/// 纯文本导出时关心的运行内容：文本、制表符、换行
static RUN_CONTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:br(?:\s[^>]*)?/>|<w:cr\s*/>")
        .expect("invalid run content regex")
});

static TOC_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<w:pStyle\s+w:val="toc\s?\d+""#).expect("invalid toc style regex")
});

/// 单个段落
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphToken<'a> {
    /// 段落原始标记
    pub markup: &'a str,
    /// 去掉标签后的可见文本（已 trim）
    pub text: String,
}

/// 标记流中的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    Paragraph(ParagraphToken<'a>),
    /// 段落之间的其它标记 / 空白，原样透传
    Other(&'a str),
}

impl MarkupToken<'_> {
    pub fn markup(&self) -> &str {
        match self {
            MarkupToken::Paragraph(p) => p.markup,
            MarkupToken::Other(s) => s,
        }
    }
}

/// 把标记流切分为段落 / 非段落片段
///
/// 所有片段按顺序拼接后与输入逐字节相同。空的非段落片段会被省略。
pub fn tokenize(xml: &str) -> Vec<MarkupToken<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for m in PARAGRAPH_RE.find_iter(xml) {
        if m.start() > cursor {
            tokens.push(MarkupToken::Other(&xml[cursor..m.start()]));
        }
        tokens.push(MarkupToken::Paragraph(ParagraphToken {
            markup: m.as_str(),
            text: visible_text(m.as_str()),
        }));
        cursor = m.end();
    }

    if cursor < xml.len() {
        tokens.push(MarkupToken::Other(&xml[cursor..]));
    }

    tokens
}

/// 去掉所有标签并解码实体后的可见文本
pub fn visible_text(markup: &str) -> String {
    decode_entities(&TAG_RE.replace_all(markup, "")).trim().to_string()
}

/// 导出整份文档的纯文本，每个段落一行
///
/// `<w:tab/>` 变为制表符，`<w:br/>` / `<w:cr/>` 变为换行，
/// 与常见 docx 文本提取器的行为保持一致，供标题识别使用。
pub fn extract_plain_text(xml: &str) -> String {
    let mut lines = Vec::new();

    for m in PARAGRAPH_RE.find_iter(xml) {
        let mut line = String::new();
        for caps in RUN_CONTENT_RE.captures_iter(m.as_str()) {
            match caps.get(1) {
                Some(text) => line.push_str(&decode_entities(text.as_str())),
                None => {
                    let tag = &caps[0];
                    if tag.starts_with("<w:tab") {
                        line.push('\t');
                    } else {
                        line.push('\n');
                    }
                }
            }
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// 段落是否属于自动生成的目录
///
/// 包含引用 TOC 的域指令，或段落样式为 TOC1 / toc 2 之类的目录级别。
pub fn is_toc_paragraph(markup: &str) -> bool {
    if markup.contains("instrText") && markup.contains("TOC") {
        return true;
    }
    TOC_STYLE_RE.is_match(markup)
}

/// 解码 XML 预定义实体
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 转义标记敏感字符 `< > & ' "`
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
