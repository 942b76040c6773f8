//! 标题候选提取
//!
//! 从文档纯文本中猜出章节标题，作为内容生成的 key。
//! 纯启发式，没有结构信息可用：
//!
//! 1. 末尾带页码的目录行直接丢弃
//! 2. `1` / `1.1` / `1.1.1.` 编号开头：去掉编号，剩余部分长度在 (0, 50) 内即为候选
//! 3. `一、` / `(一)` 中文序号开头且整行少于 50 字：整行作为候选
//! 4. 兜底：2~20 字、以汉字开头、不以句读符号结尾的短行

use once_cell::sync::Lazy;
use regex::Regex;

use crate::services::essence::is_cjk_ideograph;

/// 编号标题的最大长度（不含）
const MAX_TITLE_CHARS: usize = 50;
/// 无编号短标题的长度范围
const MIN_BARE_TITLE_CHARS: usize = 2;
const MAX_BARE_TITLE_CHARS: usize = 20;

/// 目录行：页码前是制表符、空白、省略号或至少两个引导点
static TOC_PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\s+|…+|\.{2,}|·{2,}|．{2,})\d+$").expect("invalid toc page regex")
});

static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*\.?)\s*(.*)$").expect("invalid numbered regex"));

static CJK_ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[一二三四五六七八九十]+、|[(（][一二三四五六七八九十]+[)）])")
        .expect("invalid ordinal regex")
});

const SENTENCE_ENDINGS: &[char] = &['。', '，', '、', '；', '：', '.', '!', '?', ',', ';', ':'];

/// 提取标题候选，保持首次出现顺序并去重
///
/// 返回空列表表示"未识别到章节"，调用方应跳过注入。
pub fn extract_headers(text: &str) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some(candidate) = classify_line(line) {
            if !headers.contains(&candidate) {
                headers.push(candidate);
            }
        }
    }

    headers
}

/// 判断单行是否为标题候选，是则返回候选文本
pub fn classify_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_toc_line(trimmed) {
        return None;
    }

    if let Some(caps) = NUMBERED_RE.captures(trimmed) {
        let title = caps[2].trim();
        let len = title.chars().count();
        if len > 0 && len < MAX_TITLE_CHARS {
            return Some(title.to_string());
        }
    }

    if CJK_ORDINAL_RE.is_match(trimmed) {
        return (trimmed.chars().count() < MAX_TITLE_CHARS).then(|| trimmed.to_string());
    }

    if is_bare_title(trimmed) {
        return Some(trimmed.to_string());
    }

    None
}

/// 末尾带页码的目录行
pub fn is_toc_line(trimmed: &str) -> bool {
    TOC_PAGE_NUMBER_RE.is_match(trimmed)
}

fn is_bare_title(trimmed: &str) -> bool {
    let len = trimmed.chars().count();
    if !(MIN_BARE_TITLE_CHARS..=MAX_BARE_TITLE_CHARS).contains(&len) {
        return false;
    }
    let starts_cjk = trimmed.chars().next().is_some_and(is_cjk_ideograph);
    let ends_sentence = trimmed.ends_with(SENTENCE_ENDINGS);
    starts_cjk && !ends_sentence
}
