//! 标题"本质"归一化
//!
//! 只保留 CJK 统一表意文字与 ASCII 字母数字，所有标题比较都基于它进行，
//! 这样标点、空白、编号分隔符的差异都不会影响匹配。

/// 是否为 CJK 统一表意文字（U+4E00..=U+9FFF）
pub fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// 计算字符串的本质形式
///
/// ASCII 字母保持原样大小写，不做任何大小写折叠。
pub fn essence(text: &str) -> String {
    text.chars()
        .filter(|c| is_cjk_ideograph(*c) || c.is_ascii_alphanumeric())
        .collect()
}

/// 本质形式的长度（按字符计）
pub fn essence_len(essence: &str) -> usize {
    essence.chars().count()
}
