//! Unified Result Model
//!
//! Every command maps its outcome to this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Count,
    Record,
    Cell,
    Sheet,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Input size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Whether invalid UTF-8 was replaced while loading
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub lossy: bool,

    /// Whether a record satisfied every filter predicate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TildeError {
    pub code: String,
    pub message: String,
}

impl TildeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Input path as given on the command line, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Human-readable summary line(s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (counts, records, cell values)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Metadata
    #[serde(default)]
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<TildeError>,
}

impl ResultItem {
    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            excerpt: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new count result
    pub fn count(path: impl Into<String>, excerpt: impl Into<String>) -> Self {
        let mut item = Self::with_kind(Kind::Count);
        item.path = Some(path.into());
        item.excerpt = Some(excerpt.into());
        item
    }

    /// Create a new record result carrying the record itself
    pub fn record(record: serde_json::Value) -> Self {
        let mut item = Self::with_kind(Kind::Record);
        item.excerpt = Some(record.to_string());
        item.data = Some(record);
        item
    }

    /// Create a new cell-level result (insert/update/has/row/col)
    pub fn cell(excerpt: impl Into<String>) -> Self {
        let mut item = Self::with_kind(Kind::Cell);
        item.excerpt = Some(excerpt.into());
        item
    }

    /// Create a new whole-sheet result (preview/reset)
    pub fn sheet(excerpt: impl Into<String>) -> Self {
        let mut item = Self::with_kind(Kind::Sheet);
        item.excerpt = Some(excerpt.into());
        item
    }

    /// Create a new error result
    pub fn error(error: TildeError) -> Self {
        let mut item = Self::with_kind(Kind::Error);
        item.excerpt = Some(format!("{}: {}", error.code, error.message));
        item.errors.push(error);
        item
    }

    /// Set the input path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    #[allow(dead_code)]
    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_item_count() {
        let item = ResultItem::count("notes.txt", "2 occurrences found");
        assert_eq!(item.kind, Kind::Count);
        assert_eq!(item.path, Some("notes.txt".to_string()));
        assert_eq!(item.excerpt, Some("2 occurrences found".to_string()));
    }

    #[test]
    fn test_result_item_record_keeps_payload() {
        let record = json!({"id": 1, "priority": 3});
        let item = ResultItem::record(record.clone());
        assert_eq!(item.kind, Kind::Record);
        assert_eq!(item.data, Some(record));
        assert_eq!(item.excerpt, Some(r#"{"id":1,"priority":3}"#.to_string()));
    }

    #[test]
    fn test_result_item_error() {
        let item = ResultItem::error(TildeError::new("LOAD_FAILED", "no such file"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "LOAD_FAILED");
        assert_eq!(item.excerpt, Some("LOAD_FAILED: no such file".to_string()));
    }

    #[test]
    fn test_kind_serialization() {
        let item = ResultItem::sheet("(empty sheet)");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"sheet\""));
    }

    #[test]
    fn test_meta_skips_defaults() {
        let item = ResultItem::cell("OK");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"meta\":{}"));
        assert!(!json.contains("errors"));
    }

    #[test]
    fn test_meta_matched_serialization() {
        let item = ResultItem::record(json!({"a": 1})).with_meta(Meta {
            matched: Some(false),
            ..Default::default()
        });
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"matched\":false"));
    }

    #[test]
    fn test_result_item_deserialization() {
        let json = r#"{"kind":"count","path":"a.txt","excerpt":"0 occurrences found"}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, Kind::Count);
        assert_eq!(item.meta, Meta::default());
    }

    #[test]
    fn test_result_set_push_and_extend() {
        let mut set = ResultSet::new();
        assert!(set.is_empty());
        set.push(ResultItem::cell("OK"));
        set.extend(vec![ResultItem::cell("True"), ResultItem::cell("False")]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_result_set_from_iter() {
        let set: ResultSet = (0..3).map(|i| ResultItem::cell(i.to_string())).collect();
        let excerpts: Vec<_> = set.into_iter().filter_map(|i| i.excerpt).collect();
        assert_eq!(excerpts, vec!["0", "1", "2"]);
    }
}
