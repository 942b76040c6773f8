//! 段落流匹配器 - 注入引擎的核心状态机
//!
//! 逐段落扫描标记流，只携带一个状态位：
//!
//! ```text
//!            命中已知标题（任意状态）
//!   KEEPING ─────────────────────────▶ SKIPPING
//!      ▲                                  │
//!      └──── 命中已知标题 / 遇到目录段落 ───┘
//! ```
//!
//! - 命中标题：原样输出标题段落，紧接着输出新内容，进入 SKIPPING
//! - SKIPPING 中遇到目录段落：原样输出，回到 KEEPING
//! - SKIPPING 中的其它段落：丢弃（旧正文）
//! - KEEPING 中的其它段落、所有非段落片段：原样输出

use tracing::{debug, info};

use crate::models::ContentMap;
use crate::services::content_serializer::serialize_content;
use crate::services::essence::{essence, essence_len};
use crate::services::markup::{is_toc_paragraph, tokenize, MarkupToken, ParagraphToken};
use crate::utils::logging::truncate_text;

/// 匹配状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchState {
    #[default]
    Keeping,
    Skipping,
}

/// 一次重写的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// 新的标记流
    pub xml: String,
    /// 命中的标题 key，按文档顺序，每次命中一条
    pub matched_keys: Vec<String>,
    /// 被丢弃的旧正文段落数
    pub dropped_paragraphs: usize,
    /// 因目录段落而提前结束跳过的次数
    pub toc_stops: usize,
}

impl RewriteOutcome {
    /// 从未命中任何段落的 key（按内容映射顺序）
    pub fn unused_keys<'a>(&self, content: &'a ContentMap) -> Vec<&'a str> {
        content
            .keys()
            .filter(|key| !self.matched_keys.iter().any(|m| m == key))
            .collect()
    }
}

/// 一个已知标题及其本质形式
#[derive(Debug)]
struct KnownHeader<'a> {
    key: &'a str,
    content: &'a str,
    essence: String,
    essence_len: usize,
}

/// 段落流匹配器
///
/// 标题的本质形式在构造时为本次调用计算一次，不跨调用缓存。
pub struct ParagraphMatcher<'a> {
    headers: Vec<KnownHeader<'a>>,
}

impl<'a> ParagraphMatcher<'a> {
    pub fn new(content: &'a ContentMap) -> Self {
        let headers = content
            .iter()
            .map(|(key, body)| {
                let e = essence(key);
                KnownHeader {
                    key,
                    content: body,
                    essence_len: essence_len(&e),
                    essence: e,
                }
            })
            .collect();
        Self { headers }
    }

    /// 段落文本命中的已知标题
    ///
    /// 本质相等，或段落本质以标题本质结尾（标题本质至少 2 字）。
    /// 多个标题同时命中时取本质最长者，长度相同取先插入者。
    fn find_header(&self, paragraph_text: &str) -> Option<&KnownHeader<'a>> {
        let p = essence(paragraph_text);
        if essence_len(&p) <= 1 {
            return None;
        }

        let mut best: Option<&KnownHeader<'a>> = None;
        for header in &self.headers {
            let hit = p == header.essence
                || (header.essence_len > 1 && p.ends_with(&header.essence));
            if hit && best.map_or(true, |b| header.essence_len > b.essence_len) {
                best = Some(header);
            }
        }
        best
    }

    /// 段落是否命中任一已知标题
    pub fn matches_known_header(&self, paragraph_text: &str) -> bool {
        self.find_header(paragraph_text).is_some()
    }

    /// 命中的标题 key
    pub fn matched_key(&self, paragraph_text: &str) -> Option<&'a str> {
        self.find_header(paragraph_text).map(|h| h.key)
    }

    /// 重写整个标记流
    pub fn rewrite(&self, xml: &str) -> RewriteOutcome {
        let mut outcome = RewriteOutcome {
            xml: String::with_capacity(xml.len()),
            ..Default::default()
        };
        let mut state = MatchState::Keeping;

        for token in tokenize(xml) {
            match token {
                MarkupToken::Other(markup) => outcome.xml.push_str(markup),
                MarkupToken::Paragraph(paragraph) => {
                    state = self.step(state, &paragraph, &mut outcome);
                }
            }
        }

        outcome
    }

    fn step(
        &self,
        state: MatchState,
        paragraph: &ParagraphToken<'_>,
        outcome: &mut RewriteOutcome,
    ) -> MatchState {
        if let Some(header) = self.find_header(&paragraph.text) {
            info!(
                "✅ 命中标题: [{}] ← [{}]",
                header.key,
                truncate_text(&paragraph.text, 20)
            );
            outcome.xml.push_str(paragraph.markup);
            if !header.content.trim().is_empty() {
                outcome.xml.push_str(&serialize_content(header.content));
            }
            outcome.matched_keys.push(header.key.to_string());
            return MatchState::Skipping;
        }

        match state {
            MatchState::Keeping => {
                outcome.xml.push_str(paragraph.markup);
                MatchState::Keeping
            }
            MatchState::Skipping if is_toc_paragraph(paragraph.markup) => {
                debug!("⏹️ 遇到目录段落，停止跳过: {}", truncate_text(&paragraph.text, 30));
                outcome.xml.push_str(paragraph.markup);
                outcome.toc_stops += 1;
                MatchState::Keeping
            }
            MatchState::Skipping => {
                outcome.dropped_paragraphs += 1;
                MatchState::Skipping
            }
        }
    }
}

/// 用内容映射重写标记流
pub fn rewrite_document_xml(xml: &str, content: &ContentMap) -> RewriteOutcome {
    ParagraphMatcher::new(content).rewrite(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    fn body(paragraphs: &[String]) -> String {
        format!("<w:document><w:body>{}<w:sectPr/></w:body></w:document>", paragraphs.concat())
    }

    fn paragraph_texts(xml: &str) -> Vec<String> {
        tokenize(xml)
            .into_iter()
            .filter_map(|t| match t {
                MarkupToken::Paragraph(p) => Some(p.text),
                MarkupToken::Other(_) => None,
            })
            .collect()
    }

    fn map(entries: &[(&str, &str)]) -> ContentMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_replaces_bodies_under_headers() {
        let xml = body(&[
            para("1 项目说明"),
            para("这是旧内容第一行"),
            para("这是旧内容第二行"),
            para("2 项目目标"),
            para("旧目标内容"),
        ]);
        let content = map(&[("项目说明", "新内容第一行\n新内容第二行"), ("项目目标", "新目标")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(
            paragraph_texts(&outcome.xml),
            vec!["1 项目说明", "新内容第一行", "新内容第二行", "2 项目目标", "新目标"]
        );
        assert_eq!(outcome.matched_keys, vec!["项目说明", "项目目标"]);
        assert_eq!(outcome.dropped_paragraphs, 3);
        assert!(outcome.xml.starts_with("<w:document><w:body>"));
        assert!(outcome.xml.ends_with("<w:sectPr/></w:body></w:document>"));
    }

    #[test]
    fn test_no_match_is_identity() {
        let xml = body(&[para("1 项目说明"), para("正文"), para("附录")]);
        let content = map(&[("风险分析", "x"), ("预算", "y")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(outcome.xml, xml);
        assert!(outcome.matched_keys.is_empty());
        assert_eq!(outcome.unused_keys(&content), vec!["风险分析", "预算"]);
    }

    #[test]
    fn test_header_markup_is_preserved_verbatim() {
        let header = concat!(
            r#"<w:p w:rsidR="1"><w:pPr><w:pStyle w:val="Heading1"/>"#,
            r#"<w:numPr><w:ilvl w:val="0"/></w:numPr></w:pPr>"#,
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t>1.1</w:t></w:r>"#,
            r#"<w:r><w:t xml:space="preserve"> 项目说明</w:t></w:r></w:p>"#
        );
        let xml = body(&[header.to_string(), para("旧")]);
        let content = map(&[("项目说明", "新")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(outcome.xml.matches(header).count(), 1);
        let injected = serialize_content("新");
        assert!(outcome.xml.contains(&format!("{}{}", header, injected)));
        assert!(!paragraph_texts(&outcome.xml).contains(&"旧".to_string()));
    }

    #[test]
    fn test_next_known_header_ends_skip_region() {
        let xml = body(&[
            para("1 项目说明"),
            para("旧正文"),
            para("1.2 项目目标"),
            para("保留的目标正文"),
        ]);
        // 只有第一个标题有新内容，但两个都是已知标题
        let content = map(&[("项目说明", "新"), ("项目目标", "")]);

        let outcome = rewrite_document_xml(&xml, &content);

        // 空内容的标题也会命中：保留标题、不注入、继续跳过其正文
        assert_eq!(paragraph_texts(&outcome.xml), vec!["1 项目说明", "新", "1.2 项目目标"]);
    }

    #[test]
    fn test_unknown_heading_like_text_does_not_stop_skipping() {
        let xml = body(&[
            para("1 项目说明"),
            para("1.1 背景"),
            para("本项目的名称："),
            para("2 项目目标"),
        ]);
        let content = map(&[("项目说明", "新"), ("项目目标", "目标")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(paragraph_texts(&outcome.xml), vec!["1 项目说明", "新", "2 项目目标", "目标"]);
    }

    #[test]
    fn test_toc_paragraph_stops_skipping() {
        let toc = concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="TOC1"/></w:pPr>"#,
            r#"<w:r><w:t>1 项目说明 3</w:t></w:r></w:p>"#
        );
        let xml = body(&[para("项目说明"), para("旧"), toc.to_string(), para("目录后的正文")]);
        let content = map(&[("项目说明", "新")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(
            paragraph_texts(&outcome.xml),
            vec!["项目说明", "新", "1 项目说明 3", "目录后的正文"]
        );
        assert_eq!(outcome.toc_stops, 1);
        assert_eq!(outcome.dropped_paragraphs, 1);
    }

    #[test]
    fn test_short_essence_never_matches() {
        let xml = body(&[para("……"), para("A"), para("正文")]);
        let content = map(&[("A", "x")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(outcome.xml, xml);
    }

    #[test]
    fn test_suffix_requires_two_char_key() {
        let content = map(&[("明", "x")]);
        let matcher = ParagraphMatcher::new(&content);
        assert!(!matcher.matches_known_header("项目说明"));
        // 本质完全相等时不受长度限制约束，但段落本质本身必须超过 1 字
        assert!(!matcher.matches_known_header("明"));
    }

    #[test]
    fn test_longest_key_wins_on_ambiguity() {
        let content = map(&[("说明", "短"), ("项目说明", "长")]);
        let matcher = ParagraphMatcher::new(&content);
        assert_eq!(matcher.matched_key("1.1项目说明"), Some("项目说明"));
        assert_eq!(matcher.matched_key("2.1 使用说明"), Some("说明"));
    }

    #[test]
    fn test_equal_length_keys_keep_insertion_order() {
        let content = map(&[("1 概述", "a"), ("1概述", "b")]);
        let matcher = ParagraphMatcher::new(&content);
        assert_eq!(matcher.matched_key("1. 概述"), Some("1 概述"));
    }

    #[test]
    fn test_duplicate_headers_are_injected_each_time() {
        let xml = body(&[
            para("3.1 说明"),
            para("旧1"),
            para("正文标题甲"),
            para("4.1 说明"),
            para("旧2"),
        ]);
        let content = map(&[("说明", "新说明"), ("正文标题甲", "甲")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(
            paragraph_texts(&outcome.xml),
            vec!["3.1 说明", "新说明", "正文标题甲", "甲", "4.1 说明", "新说明"]
        );
        assert_eq!(outcome.matched_keys, vec!["说明", "正文标题甲", "说明"]);
    }

    #[test]
    fn test_non_paragraph_markup_survives_skip_region() {
        let xml = format!(
            "<w:body>{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}</w:body>",
            para("项目说明"),
            para("表格内旧文本"),
            para("尾部")
        );
        let content = map(&[("项目说明", "新")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert!(outcome.xml.contains("<w:tbl><w:tr><w:tc></w:tc></w:tr></w:tbl>"));
        assert!(!outcome.xml.contains("表格内旧文本"));
        assert!(!outcome.xml.contains("尾部"));
    }

    #[test]
    fn test_empty_paragraph_before_table_keeps_table_balanced() {
        let xml = body(&[
            para("1 项目说明"),
            r#"<w:p w:rsidR="00A1" w:rsidRDefault="00A1"/>"#.to_string(),
            format!("<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>", para("旧表格")),
            para("2 项目目标"),
            para("旧目标"),
        ]);
        let content = map(&[("项目说明", "新说明"), ("项目目标", "新目标")]);

        let outcome = rewrite_document_xml(&xml, &content);

        assert_eq!(
            outcome.xml.matches("<w:tbl>").count(),
            outcome.xml.matches("</w:tbl>").count()
        );
        assert_eq!(
            outcome.xml.matches("<w:tc>").count(),
            outcome.xml.matches("</w:tc>").count()
        );
        assert!(!outcome.xml.contains("旧表格"));
        assert_eq!(
            paragraph_texts(&outcome.xml),
            vec!["1 项目说明", "新说明", "2 项目目标", "新目标"]
        );
    }
}
