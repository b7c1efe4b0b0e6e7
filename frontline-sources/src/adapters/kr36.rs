//! 36氪 newsflashes

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::{info, instrument};

use frontline_core::{NewsExtra, NewsItem};

use crate::adapter::{SourceAdapter, SourceQuery};
use crate::adapters::selector;
use crate::error::SourceError;
use crate::http::HttpFetcher;
use crate::normalize::{absolutize, clean_text, parse_relative_date, retain_valid};

pub struct Kr36Adapter {
    http: HttpFetcher,
    page_url: String,
    base_url: String,
}

impl Kr36Adapter {
    pub fn new(http: HttpFetcher, page_url: &str, base_url: &str) -> Self {
        Self {
            http,
            page_url: page_url.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for Kr36Adapter {
    #[instrument(skip_all, name = "_36kr")]
    async fn fetch(&self, _query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError> {
        let html = self.http.get_text(&self.page_url).await?;
        let items = parse_newsflashes(&html, &self.base_url, Utc::now())?;
        info!("Fetched {} 36氪 newsflashes", items.len());
        Ok(items)
    }
}

/// Items missing a link, a title or a readable time are skipped
pub fn parse_newsflashes(
    html: &str,
    base_url: &str,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, SourceError> {
    if url::Url::parse(base_url).is_err() {
        return Err(SourceError::InvalidConfig(format!(
            "36kr base URL is not a URL: {}",
            base_url
        )));
    }

    let item_sel = selector(".newsflash-item")?;
    let title_sel = selector("a.item-title")?;
    let time_sel = selector(".time")?;

    let document = Html::parse_document(html);
    let items = document
        .select(&item_sel)
        .filter_map(|el| {
            let link = el.select(&title_sel).next()?;
            let href = link.value().attr("href")?;
            let title = clean_text(&link.text().collect::<String>());
            if title.is_empty() {
                return None;
            }
            let time = el.select(&time_sel).next()?.text().collect::<String>();
            let date = parse_relative_date(&time, now)?;
            let url = absolutize(base_url, href)?;
            Some(NewsItem::new(href, title, url).with_extra(NewsExtra::dated(date)))
        })
        .collect();

    Ok(retain_valid(items))
}
