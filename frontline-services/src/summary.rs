//! AI summary service
//!
//! Generation sits behind [`SummaryGenerator`]; the shipped implementation
//! produces placeholder content from the platform catalog. Results are
//! cached per category for an hour.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use frontline_core::{
    platforms_by_category, AISection, AISummaryData, Category, FeedError, FeedResult, HotTopic,
    Trend,
};
use tracing::{debug, warn};

use crate::cache::{summary_key, CacheStats, TtlCache};

/// Default freshness window for summaries (1 hour)
pub const SUMMARY_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Default deadline around one generation
pub const SUMMARY_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, category: Category) -> FeedResult<AISummaryData>;
}

/// Generates placeholder summaries naming the category's platforms
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderGenerator;

#[async_trait]
impl SummaryGenerator for PlaceholderGenerator {
    async fn generate(&self, category: Category) -> FeedResult<AISummaryData> {
        Ok(placeholder_summary(category))
    }
}

pub fn placeholder_summary(category: Category) -> AISummaryData {
    let name = category.display_name();
    let platforms = platforms_by_category(category);
    let keys: Vec<String> = platforms.iter().map(|p| p.platform.clone()).collect();

    let hot_topics = platforms
        .iter()
        .take(3)
        .map(|p| HotTopic {
            topic: format!("{}热点", p.title),
            description: format!("{}上讨论度最高的话题汇总", p.title),
            related_platforms: vec![p.platform.clone()],
        })
        .collect();

    let trends = vec![
        Trend {
            title: format!("{}关注度上升", name),
            description: format!("{}类内容在多个平台同时出现", name),
        },
        Trend {
            title: "跨平台话题".to_string(),
            description: "同一事件在不同平台的热度对比".to_string(),
        },
    ];

    let sections = (!keys.is_empty()).then(|| {
        vec![AISection {
            title: format!("{}概览", name),
            content: format!("本次汇总覆盖 {} 个平台。", keys.len()),
            platforms: Some(keys.clone()),
        }]
    });

    AISummaryData {
        category: category.key().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        summary: format!("{}板块今日热点概览", name),
        hot_topics,
        trends,
        sections,
    }
}

pub struct SummaryService {
    generator: Arc<dyn SummaryGenerator>,
    cache: Arc<TtlCache<AISummaryData>>,
    cache_ttl: Duration,
    timeout: Duration,
}

impl SummaryService {
    pub fn new(
        generator: Arc<dyn SummaryGenerator>,
        cache_ttl: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            cache: Arc::new(TtlCache::new()),
            cache_ttl,
            timeout,
        }
    }

    pub fn placeholder() -> Self {
        Self::new(Arc::new(PlaceholderGenerator), SUMMARY_CACHE_TTL, SUMMARY_TIMEOUT)
    }

    pub fn cache(&self) -> &Arc<TtlCache<AISummaryData>> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Summary for `category`; missing or unknown categories are rejected
    pub async fn summarize(&self, category: Option<&str>) -> FeedResult<AISummaryData> {
        let raw = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| FeedError::invalid_request("缺少 category 参数"))?;
        let category: Category = raw.parse().map_err(FeedError::invalid_request)?;

        let key = summary_key(category.key());
        if let Some(summary) = self.cache.get(&key, self.cache_ttl) {
            debug!("Cache hit for {}", key);
            return Ok(summary);
        }

        let generated = tokio::time::timeout(self.timeout, self.generator.generate(category));
        let summary = match generated.await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Summary for {} timed out after {:?}", category, self.timeout);
                return Err(FeedError::upstream(
                    "ai",
                    format!("summary timed out after {}s", self.timeout.as_secs()),
                ));
            }
        };

        self.cache.set(key, summary.clone());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    #[async_trait]
    impl SummaryGenerator for Counting {
        async fn generate(&self, category: Category) -> FeedResult<AISummaryData> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(placeholder_summary(category))
        }
    }

    struct Stalled;

    #[async_trait]
    impl SummaryGenerator for Stalled {
        async fn generate(&self, category: Category) -> FeedResult<AISummaryData> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(placeholder_summary(category))
        }
    }

    #[test]
    fn test_placeholder_references_category_platforms() {
        let summary = placeholder_summary(Category::Tech);
        assert_eq!(summary.category, "tech");
        assert!(!summary.hot_topics.is_empty());
        for topic in &summary.hot_topics {
            for key in &topic.related_platforms {
                let platform = frontline_core::find_platform(key).unwrap();
                assert_eq!(platform.category, Category::Tech);
            }
        }
    }

    #[test]
    fn test_placeholder_for_empty_category() {
        let summary = placeholder_summary(Category::Favorites);
        assert!(summary.hot_topics.is_empty());
        assert!(summary.sections.is_none());
    }

    #[tokio::test]
    async fn test_missing_and_unknown_category() {
        let service = SummaryService::placeholder();
        assert_eq!(service.summarize(None).await.unwrap_err().code(), 400);
        assert_eq!(service.summarize(Some("")).await.unwrap_err().code(), 400);
        assert_eq!(service.summarize(Some("weather")).await.unwrap_err().code(), 400);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_per_category() {
        let generator = Arc::new(Counting(AtomicUsize::new(0)));
        let service = SummaryService::new(
            Arc::clone(&generator) as Arc<dyn SummaryGenerator>,
            SUMMARY_CACHE_TTL,
            SUMMARY_TIMEOUT,
        );

        let first = service.summarize(Some("tech")).await.unwrap();
        let second = service.summarize(Some("TECH")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);

        service.summarize(Some("finance")).await.unwrap();
        assert_eq!(generator.0.load(Ordering::SeqCst), 2);

        tokio::time::advance(SUMMARY_CACHE_TTL).await;
        service.summarize(Some("tech")).await.unwrap();
        assert_eq!(generator.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_deadline() {
        let service = SummaryService::new(Arc::new(Stalled), SUMMARY_CACHE_TTL, SUMMARY_TIMEOUT);
        let err = service.summarize(Some("hot")).await.unwrap_err();
        assert_eq!(err.code(), 500);
        assert_eq!(service.cache_stats().entries, 0);
    }
}
