//! 今日头条 hot board

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use frontline_core::{NewsExtra, NewsIcon, NewsItem};

use crate::adapter::{SourceAdapter, SourceQuery};
use crate::error::SourceError;
use crate::http::HttpFetcher;
use crate::normalize::{proxy_picture, retain_valid};

#[derive(Debug, Deserialize)]
pub struct HotBoard {
    #[serde(default)]
    pub data: Vec<HotBoardEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HotBoardEntry {
    #[serde(default)]
    pub cluster_id_str: String,
    #[serde(default)]
    pub title: String,
    pub hot_value: Option<String>,
    pub label_uri: Option<LabelUri>,
}

#[derive(Debug, Deserialize)]
pub struct LabelUri {
    pub url: Option<String>,
}

pub struct ToutiaoAdapter {
    http: HttpFetcher,
    api: String,
    prefix: String,
}

impl ToutiaoAdapter {
    pub fn new(http: HttpFetcher, api: &str, prefix: &str) -> Self {
        Self {
            http,
            api: api.to_string(),
            prefix: prefix.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for ToutiaoAdapter {
    #[instrument(skip_all, name = "toutiao")]
    async fn fetch(&self, _query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError> {
        let board: HotBoard = self.http.get_json(&self.api).await?;
        let items = normalize_board(board, &self.prefix);
        info!("Fetched {} 头条 hot topics", items.len());
        Ok(items)
    }
}

/// Board order is the ranking; it is kept as-is
pub fn normalize_board(board: HotBoard, prefix: &str) -> Vec<NewsItem> {
    let items = board
        .data
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let url = format!("{}{}/", prefix, entry.cluster_id_str);
            let icon = entry
                .label_uri
                .and_then(|l| l.url)
                .filter(|u| !u.is_empty())
                .map(|u| NewsIcon {
                    url: proxy_picture(&u),
                    scale: 1.5,
                    info: None,
                });
            let extra = NewsExtra {
                info: entry.hot_value,
                rank: Some(idx as u32 + 1),
                icon,
                ..NewsExtra::default()
            };
            NewsItem::new(entry.cluster_id_str, entry.title, url).with_extra(extra)
        })
        .collect();

    retain_valid(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_board() {
        let board: HotBoard = serde_json::from_str(
            r#"{"status":"success","data":[
                {"ClusterIdStr":"7001","Title":"第一","HotValue":"3520000",
                 "LabelUri":{"url":"https://p3.toutiaoimg.com/hot.png"}},
                {"ClusterIdStr":"7002","Title":"第二"},
                {"ClusterIdStr":"","Title":"坏数据"}
            ]}"#,
        )
        .unwrap();

        let items = normalize_board(board, "https://www.toutiao.com/trending/");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url, "https://www.toutiao.com/trending/7001/");

        let extra = items[0].extra.as_ref().unwrap();
        assert_eq!(extra.info.as_deref(), Some("3520000"));
        assert_eq!(extra.rank, Some(1));
        assert!(extra.icon.as_ref().unwrap().url.starts_with("/proxy/image?url="));

        assert!(items[1].extra.as_ref().unwrap().icon.is_none());
    }
}
