//! 章节内容映射
//!
//! `标题 -> 内容` 的有序映射，由外部内容生成方（LLM 或内容文件）产出，
//! 每个文档每次生成只创建一次，交给段落匹配器消费后即丢弃。

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 章节内容映射
///
/// 保留插入顺序；重复插入同一标题会原地覆盖内容。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMap {
    entries: Vec<(String, String)>,
}

impl ContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一个章节
    pub fn insert(&mut self, header: impl Into<String>, content: impl Into<String>) {
        let header = header.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(h, _)| *h == header) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((header, content)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, c)| c.as_str())
    }

    /// 按插入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, c)| (h.as_str(), c.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ContentMap::new();
        for (header, content) in iter {
            map.insert(header, content);
        }
        map
    }
}

/// 生成方返回的单个值
///
/// LLM 偶尔会把段落拆成数组，或者直接给出数字，这里统一收敛为文本。
/// 嵌套对象等其它形状落到 `Other`，单个值形状不对不会拖垮整份映射。
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentValue {
    Text(String),
    Lines(Vec<String>),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Other(serde_json::Value),
}

impl ContentValue {
    fn into_text(self) -> String {
        match self {
            ContentValue::Text(s) => s,
            ContentValue::Lines(lines) => lines.join("\n"),
            ContentValue::Integer(n) => n.to_string(),
            ContentValue::Float(n) => n.to_string(),
            ContentValue::Flag(b) => b.to_string(),
            ContentValue::Other(value) => value_text(&value),
        }
    }
}

/// 任意 JSON 值展开为文本：数组逐项成行，对象按 `键：值` 成行
fn value_text(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, v)| format!("{}：{}", key, value_text(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

impl<'de> Deserialize<'de> for ContentMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContentMapVisitor;

        impl<'de> Visitor<'de> for ContentMapVisitor {
            type Value = ContentMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of section headers to content")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = ContentMap::new();
                // null 值直接丢弃
                while let Some((header, value)) =
                    access.next_entry::<String, Option<ContentValue>>()?
                {
                    if let Some(value) = value {
                        map.insert(header, value.into_text());
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ContentMapVisitor)
    }
}

impl Serialize for ContentMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (header, content) in &self.entries {
            map.serialize_entry(header, content)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_document_order() {
        let map: ContentMap =
            serde_json::from_str(r#"{"项目目标": "b", "项目说明": "a", "范围": "c"}"#).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["项目目标", "项目说明", "范围"]);
    }

    #[test]
    fn test_value_coercion() {
        let map: ContentMap = serde_json::from_str(
            r#"{"段落": ["第一段", "第二段"], "预算": 120, "启用": true, "空": null}"#,
        )
        .unwrap();
        assert_eq!(map.get("段落"), Some("第一段\n第二段"));
        assert_eq!(map.get("预算"), Some("120"));
        assert_eq!(map.get("启用"), Some("true"));
        assert_eq!(map.get("空"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_nested_values_do_not_discard_other_sections() {
        let map: ContentMap = serde_json::from_str(
            r#"{"项目说明": "x", "组织架构": {"负责人": "张三"}, "里程碑": ["启动", 2, null]}"#,
        )
        .unwrap();
        assert_eq!(map.get("项目说明"), Some("x"));
        assert_eq!(map.get("组织架构"), Some("负责人：张三"));
        assert_eq!(map.get("里程碑"), Some("启动\n2"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_toml_table() {
        let text = "\"项目说明\" = \"新内容\"\n\"项目目标\" = [\"一\", \"二\"]\n";
        let map: ContentMap = toml::from_str(text).unwrap();
        assert_eq!(map.get("项目说明"), Some("新内容"));
        assert_eq!(map.get("项目目标"), Some("一\n二"));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut map = ContentMap::new();
        map.insert("甲", "1");
        map.insert("乙", "2");
        map.insert("甲", "3");
        let entries: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(entries, vec![("甲", "3"), ("乙", "2")]);
    }

    #[test]
    fn test_serialize_round_order() {
        let map: ContentMap = [("乙", "2"), ("甲", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"乙":"2","甲":"1"}"#);
    }
}
