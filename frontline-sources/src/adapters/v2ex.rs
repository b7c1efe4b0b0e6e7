//! V2EX channel feeds (JSON Feed format)

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{info, instrument};

use frontline_core::{NewsExtra, NewsItem, SortOrder};

use crate::adapter::{SourceAdapter, SourceQuery};
use crate::error::SourceError;
use crate::http::HttpFetcher;
use crate::normalize::{parse_local_datetime, retain_valid, sort_by_date};

/// Channels merged into the `v2ex` platform
pub const V2EX_CHANNELS: [&str; 4] = ["create", "ideas", "programmer", "share"];

#[derive(Debug, Deserialize)]
pub struct V2exFeed {
    #[serde(default)]
    pub items: Vec<V2exEntry>,
}

#[derive(Debug, Deserialize)]
pub struct V2exEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub date_modified: Option<String>,
    pub date_published: Option<String>,
}

pub struct V2exAdapter {
    http: HttpFetcher,
    feed_root: String,
}

impl V2exAdapter {
    pub fn new(http: HttpFetcher, feed_root: &str) -> Self {
        Self {
            http,
            feed_root: feed_root.trim_end_matches('/').to_string(),
        }
    }

    fn channel_url(&self, channel: &str) -> String {
        format!("{}/{}.json", self.feed_root, channel)
    }
}

#[async_trait]
impl SourceAdapter for V2exAdapter {
    #[instrument(skip_all, name = "v2ex")]
    async fn fetch(&self, _query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError> {
        let urls: Vec<String> = V2EX_CHANNELS.iter().map(|c| self.channel_url(c)).collect();
        let feeds = try_join_all(urls.iter().map(|url| self.http.get_json::<V2exFeed>(url))).await?;

        let items = normalize_feeds(feeds);
        info!("Fetched {} V2EX topics", items.len());
        Ok(items)
    }
}

/// Merge channel feeds, newest first
pub fn normalize_feeds(feeds: Vec<V2exFeed>) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = feeds
        .into_iter()
        .flat_map(|feed| feed.items)
        .map(|entry| {
            let date = entry
                .date_modified
                .as_deref()
                .or(entry.date_published.as_deref())
                .and_then(parse_local_datetime);
            let item = NewsItem::new(entry.id, entry.title, entry.url);
            match date {
                Some(ms) => item.with_extra(NewsExtra::dated(ms)),
                None => item,
            }
        })
        .collect();

    items = retain_valid(items);
    sort_by_date(&mut items, SortOrder::Desc);
    items
}
