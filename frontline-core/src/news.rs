//! News data structures shared by every platform adapter

use serde::{Deserialize, Serialize};
use std::fmt;

/// One piece of aggregated content
///
/// `id` is unique within the owning platform only. Items that reach a client
/// always have a non-empty `id` and `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Source-defined identifier (native ID or URL)
    pub id: String,
    /// Headline
    pub title: String,
    /// Absolute URL of the original content
    pub url: String,
    /// Per-platform metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<NewsExtra>,
}

impl NewsItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: NewsExtra) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Publication time in epoch milliseconds, if the source reported one
    pub fn date(&self) -> Option<i64> {
        self.extra.as_ref().and_then(|e| e.date)
    }

    /// Whether the item satisfies the minimum shape a client can render
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.url.trim().is_empty()
    }
}

/// Optional metadata bag
///
/// A closed set of typed fields: adapters fill in whatever their category
/// provides (hot-search heat, stock moves, ratings, ...) and leave the rest empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsExtra {
    /// Short secondary line (e.g. "✰ 1.2k", heat value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Tooltip / description text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
    /// Publication time, epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    /// Preformatted date for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<NewsIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<NewsThumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<NewsVideo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<NewsRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<CommentPreview>,
    /// Current price (stock leaderboards)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(rename = "market_capital", skip_serializing_if = "Option::is_none")]
    pub market_capital: Option<String>,
}

impl NewsExtra {
    pub fn dated(date_ms: i64) -> Self {
        Self {
            date: Some(date_ms),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsIcon {
    pub url: String,
    #[serde(default = "default_icon_scale")]
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

fn default_icon_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsThumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsVideo {
    pub info: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRating {
    pub count: u64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentPreview {
    pub content: String,
    pub avatar: String,
}

/// Either a bare comment count or a featured comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentField {
    Count(u64),
    Preview(CommentPreview),
}

/// Requested ordering of a news list by publication time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown order: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_validity() {
        assert!(NewsItem::new("1", "T", "https://x").is_valid());
        assert!(!NewsItem::new("", "T", "https://x").is_valid());
        assert!(!NewsItem::new("1", "T", "   ").is_valid());
    }

    #[test]
    fn test_extra_serializes_sparse_camel_case() {
        let item = NewsItem::new("a", "b", "https://c").with_extra(NewsExtra {
            date_str: Some("今天".to_string()),
            market_capital: Some("1.2万亿".to_string()),
            ..NewsExtra::default()
        });
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "a",
                "title": "b",
                "url": "https://c",
                "extra": { "dateStr": "今天", "market_capital": "1.2万亿" }
            })
        );
    }

    #[test]
    fn test_item_without_extra_omits_field() {
        let value = serde_json::to_value(NewsItem::new("1", "T", "https://x")).unwrap();
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn test_comment_field_accepts_both_shapes() {
        let count: CommentField = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(count, CommentField::Count(12));

        let preview: CommentField =
            serde_json::from_value(json!({"content": "nice", "avatar": "https://a"})).unwrap();
        assert!(matches!(preview, CommentField::Preview(p) if p.content == "nice"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }
}
