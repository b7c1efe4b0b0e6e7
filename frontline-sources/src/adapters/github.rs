//! GitHub trending repositories, scraped from the trending page

use async_trait::async_trait;
use scraper::Html;
use tracing::{info, instrument};

use frontline_core::{NewsExtra, NewsItem};

use crate::adapter::{SourceAdapter, SourceQuery};
use crate::adapters::selector;
use crate::error::SourceError;
use crate::http::HttpFetcher;
use crate::normalize::{absolutize, clean_text, retain_valid};

pub struct GithubTrendingAdapter {
    http: HttpFetcher,
    trending_url: String,
    base_url: String,
}

impl GithubTrendingAdapter {
    pub fn new(http: HttpFetcher, trending_url: &str, base_url: &str) -> Self {
        Self {
            http,
            trending_url: trending_url.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for GithubTrendingAdapter {
    #[instrument(skip_all, name = "github")]
    async fn fetch(&self, _query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError> {
        let html = self.http.get_text(&self.trending_url).await?;
        let items = parse_trending(&html, &self.base_url)?;
        info!("Fetched {} trending repositories", items.len());
        Ok(items)
    }
}

/// Extract repositories from a trending page; `href` becomes the id
pub fn parse_trending(html: &str, base_url: &str) -> Result<Vec<NewsItem>, SourceError> {
    if url::Url::parse(base_url).is_err() {
        return Err(SourceError::InvalidConfig(format!(
            "GitHub base URL is not a URL: {}",
            base_url
        )));
    }

    let article_sel = selector("main .Box div[data-hpc] > article")?;
    let link_sel = selector("h2 a")?;
    let star_sel = selector(r#"a[href$="stargazers"]"#)?;
    let desc_sel = selector("p")?;

    let document = Html::parse_document(html);
    let mut items = Vec::new();

    for article in document.select(&article_sel) {
        let Some(link) = article.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = clean_text(&link.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        let Some(url) = absolutize(base_url, href) else {
            continue;
        };

        let stars: String = article
            .select(&star_sel)
            .next()
            .map(|a| a.text().collect::<String>())
            .unwrap_or_default()
            .split_whitespace()
            .collect();
        let desc = article
            .select(&desc_sel)
            .next()
            .map(|p| clean_text(&p.text().collect::<String>()))
            .filter(|d| !d.is_empty());

        let extra = NewsExtra {
            info: Some(format!("✰ {}", stars)),
            hover: desc,
            ..NewsExtra::default()
        };
        items.push(NewsItem::new(href, title, url).with_extra(extra));
    }

    Ok(retain_valid(items))
}
