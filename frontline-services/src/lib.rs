//! Service layer for the Frontline news aggregator
//!
//! Composes the platform registry and the TTL cache into the news
//! aggregation service, plus the summary and image-proxy services that
//! reuse the same cache.

pub mod aggregator;
pub mod cache;
pub mod image_proxy;
pub mod registry;
pub mod summary;

pub use aggregator::{
    AggregatorConfig, CacheStatus, NewsAggregator, NewsListing, NewsRequest, FETCH_TIMEOUT,
    NEWS_CACHE_TTL,
};
pub use cache::{news_key, spawn_sweeper, summary_key, CacheStats, SweeperHandle, TtlCache};
pub use image_proxy::{
    ImageFormat, ImageOptions, ImageProxy, ImageProxyConfig, ImageSource, ProcessedImage,
    ProxiedImage, ProxyRequest,
};
pub use registry::PlatformRegistry;
pub use summary::{PlaceholderGenerator, SummaryGenerator, SummaryService};
