//! News aggregation service
//!
//! Per request: validate → cache read → registry lookup → adapter call under
//! a deadline → cache write. Each adapter runs in its own task, so a panic or
//! a hang in one platform's adapter only fails that platform's request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use frontline_core::{FeedError, FeedResult, NewsItem, SortOrder};
use frontline_sources::normalize::{retain_valid, sort_by_date};
use frontline_sources::SourceQuery;
use tracing::{debug, warn};

use crate::cache::{news_key, CacheStats, TtlCache};
use crate::registry::PlatformRegistry;

/// Default freshness window for news listings (2 minutes)
pub const NEWS_CACHE_TTL: Duration = Duration::from_secs(120);

/// Default deadline around one adapter invocation
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the NewsAggregator
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: NEWS_CACHE_TTL,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

/// Whether a response was served from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// `X-Cache` header value
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One platform's listing plus where it came from
#[derive(Debug, Clone)]
pub struct NewsListing {
    pub items: Vec<NewsItem>,
    pub cache: CacheStatus,
}

/// Incoming `/news` parameters
#[derive(Debug, Clone, Default)]
pub struct NewsRequest {
    pub platform: Option<String>,
    /// Applied after the cache read; `None` keeps the adapter's order
    pub order: Option<SortOrder>,
}

impl NewsRequest {
    pub fn for_platform(platform: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            order: None,
        }
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }
}

pub struct NewsAggregator {
    registry: Arc<PlatformRegistry>,
    cache: Arc<TtlCache<Vec<NewsItem>>>,
    config: AggregatorConfig,
}

impl NewsAggregator {
    pub fn new(registry: Arc<PlatformRegistry>, config: AggregatorConfig) -> Self {
        Self::with_cache(registry, Arc::new(TtlCache::new()), config)
    }

    pub fn with_cache(
        registry: Arc<PlatformRegistry>,
        cache: Arc<TtlCache<Vec<NewsItem>>>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            registry,
            cache,
            config,
        }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<TtlCache<Vec<NewsItem>>> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Serve one platform's listing
    pub async fn fetch_news(&self, request: &NewsRequest) -> FeedResult<NewsListing> {
        let platform = request
            .platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| FeedError::invalid_request("缺少 platform 参数"))?;

        let key = news_key(platform);
        let (mut items, cache) = match self.cache.get(&key, self.config.cache_ttl) {
            Some(items) => {
                debug!("Cache hit for {}", key);
                (items, CacheStatus::Hit)
            }
            None => {
                debug!("Cache miss for {}", key);
                let items = self.invoke_adapter(platform).await?;
                self.cache.set(key, items.clone());
                (items, CacheStatus::Miss)
            }
        };

        if let Some(order) = request.order {
            sort_by_date(&mut items, order);
        }

        Ok(NewsListing { items, cache })
    }

    /// Run the platform's adapter in its own task under the fetch deadline
    async fn invoke_adapter(&self, platform: &str) -> FeedResult<Vec<NewsItem>> {
        let adapter = self.registry.lookup(platform)?;
        let query = SourceQuery::for_platform(platform);

        let mut task = tokio::spawn(async move { adapter.fetch(&query).await });

        let outcome = match tokio::time::timeout(self.config.fetch_timeout, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                task.abort();
                warn!(
                    "Adapter for {} timed out after {:?}",
                    platform, self.config.fetch_timeout
                );
                return Err(FeedError::upstream(
                    platform,
                    format!("timed out after {}s", self.config.fetch_timeout.as_secs()),
                ));
            }
        };

        match outcome {
            Ok(Ok(items)) => {
                let items = retain_valid(items);
                debug!("Fetched {} items for {}", items.len(), platform);
                Ok(items)
            }
            Ok(Err(e)) => {
                warn!("Adapter for {} failed: {}", platform, e);
                Err(FeedError::upstream(platform, e.to_string()))
            }
            Err(join_err) if join_err.is_panic() => {
                warn!("Adapter for {} panicked", platform);
                Err(FeedError::upstream(platform, "adapter panicked"))
            }
            Err(join_err) => Err(FeedError::internal(format!(
                "adapter task for {} was cancelled: {}",
                platform, join_err
            ))),
        }
    }
}
