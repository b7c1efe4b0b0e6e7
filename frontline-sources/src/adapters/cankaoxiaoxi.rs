//! 参考消息 channel lists

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{info, instrument};

use frontline_core::{NewsExtra, NewsItem, SortOrder};

use crate::adapter::{SourceAdapter, SourceQuery};
use crate::error::SourceError;
use crate::http::HttpFetcher;
use crate::normalize::{parse_local_datetime, retain_valid, sort_by_date};

pub const CANKAOXIAOXI_CHANNELS: [&str; 3] = ["zhongguo", "guandian", "gj"];

#[derive(Debug, Deserialize)]
pub struct ChannelList {
    #[serde(default)]
    pub list: Vec<ChannelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelEntry {
    pub data: ChannelArticle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelArticle {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Shanghai wall time, `YYYY-MM-DD HH:MM:SS`
    pub publish_time: Option<String>,
}

pub struct CankaoxiaoxiAdapter {
    http: HttpFetcher,
    channel_root: String,
}

impl CankaoxiaoxiAdapter {
    pub fn new(http: HttpFetcher, channel_root: &str) -> Self {
        Self {
            http,
            channel_root: channel_root.to_string(),
        }
    }

    fn channel_url(&self, channel: &str) -> String {
        format!("{}{}/list.json", self.channel_root, channel)
    }
}

#[async_trait]
impl SourceAdapter for CankaoxiaoxiAdapter {
    #[instrument(skip_all, name = "cankaoxiaoxi")]
    async fn fetch(&self, _query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError> {
        let urls: Vec<String> = CANKAOXIAOXI_CHANNELS
            .iter()
            .map(|c| self.channel_url(c))
            .collect();
        let lists =
            try_join_all(urls.iter().map(|url| self.http.get_json::<ChannelList>(url))).await?;

        let items = normalize_lists(lists);
        info!("Fetched {} 参考消息 articles", items.len());
        Ok(items)
    }
}

pub fn normalize_lists(lists: Vec<ChannelList>) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = lists
        .into_iter()
        .flat_map(|l| l.list)
        .map(|entry| {
            let article = entry.data;
            let date = article.publish_time.as_deref().and_then(parse_local_datetime);
            let item = NewsItem::new(article.id, article.title, article.url);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lists() {
        let a: ChannelList = serde_json::from_str(
            r#"{"list":[
                {"data":{"id":"a1","title":"早","url":"https://china.cankaoxiaoxi.com/a1","publishTime":"2024-05-01 08:00:00"}},
                {"data":{"id":"a2","title":"缺链接","url":"","publishTime":"2024-05-01 09:00:00"}}
            ]}"#,
        )
        .unwrap();
        let b: ChannelList = serde_json::from_str(
            r#"{"list":[
                {"data":{"id":"b1","title":"晚","url":"https://china.cankaoxiaoxi.com/b1","publishTime":"2024-05-01 10:30:00"}}
            ]}"#,
        )
        .unwrap();

        let items = normalize_lists(vec![a, b]);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b1", "a1"]);
    }

    #[test]
    fn test_channel_url() {
        let adapter = CankaoxiaoxiAdapter::new(
            HttpFetcher::new(),
            "https://china.cankaoxiaoxi.com/json/channel/",
        );
        assert_eq!(
            adapter.channel_url("gj"),
            "https://china.cankaoxiaoxi.com/json/channel/gj/list.json"
        );
    }
}
