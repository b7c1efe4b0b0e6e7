//! AI summary payload types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AISummaryData {
    pub category: String,
    /// RFC 3339 generation time
    pub generated_at: String,
    pub summary: String,
    pub hot_topics: Vec<HotTopic>,
    pub trends: Vec<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<AISection>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotTopic {
    pub topic: String,
    pub description: String,
    pub related_platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AISection {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
}
