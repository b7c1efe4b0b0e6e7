//! TTL Cache Layer
//!
//! A policy-free key/value store: the caller supplies the TTL on every read,
//! so news listings, summaries and proxied images can share one mechanism
//! with different freshness windows. Expiry is lazy; an optional background
//! sweeper reclaims memory for keys that are never read again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Cache key for a platform's news listing
pub fn news_key(platform: &str) -> String {
    format!("news:{}", platform)
}

/// Cache key for a category's AI summary
pub fn summary_key(category: &str) -> String {
    format!("ai:{}", category)
}

/// Cache key for a transformed image: md5 hex of `url-<options json>`
///
/// Distinct transforms of the same source never collide.
pub fn image_key<O: Serialize>(url: &str, options: &O) -> String {
    let options = serde_json::to_string(options).unwrap_or_default();
    format!("{:x}", md5::compute(format!("{}-{}", url, options)))
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    payload: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// In-memory TTL cache
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Maximum number of entries; `None` is unbounded
    capacity: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache holding at most `capacity` entries; the oldest is evicted first
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new()
        }
    }

    /// Hit iff `now - stored_at < ttl`
    ///
    /// Stale entries are left in place; the next `set` overwrites them.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();

        match entries.get(key) {
            Some(entry) if entry.is_fresh(now, ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.payload.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `payload` under `key`, always overwriting
    pub fn set(&self, key: impl Into<String>, payload: V) {
        let key = key.into();
        let mut entries = self.entries.write();

        if let Some(capacity) = self.capacity {
            if entries.len() >= capacity && !entries.contains_key(&key) {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    debug!("Cache full ({} entries), evicting {}", capacity, oldest);
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.write().remove(key).map(|e| e.payload)
    }

    /// Drop every entry older than `ttl`, returning how many were removed
    pub fn sweep(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, ttl));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a background sweep task
pub struct SweeperHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

/// Sweep `cache` every `every`, removing entries older than `ttl`
pub fn spawn_sweeper<V>(
    cache: Arc<TtlCache<V>>,
    ttl: Duration,
    every: Duration,
    name: &'static str,
) -> SweeperHandle
where
    V: Clone + Send + Sync + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + every, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    debug!("{} cache sweeper stopped", name);
                    break;
                }
                _ = interval.tick() => {
                    let removed = cache.sweep(ttl);
                    if removed > 0 {
                        debug!("Swept {} expired entries from {} cache", removed, name);
                    }
                }
            }
        }
    });

    SweeperHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(120);

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_miss_after() {
        let cache = TtlCache::new();
        cache.set("news:demo", vec![1, 2, 3]);

        tokio::time::advance(Duration::from_secs(119)).await;
        assert_eq!(cache.get("news:demo", TTL), Some(vec![1, 2, 3]));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("news:demo", TTL), None);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_is_per_read() {
        let cache = TtlCache::new();
        cache.set("k", "v");
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(cache.get("k", Duration::from_secs(10)), None);
        assert_eq!(cache.get("k", Duration::from_secs(60)), Some("v"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_refreshes() {
        let cache = TtlCache::new();
        cache.set("k", 1);
        tokio::time::advance(Duration::from_secs(100)).await;
        cache.set("k", 2);
        tokio::time::advance(Duration::from_secs(100)).await;

        assert_eq!(cache.get("k", TTL), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_key_is_miss() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert_eq!(cache.get("nope", TTL), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_evicts_oldest() {
        let cache = TtlCache::bounded(2);
        cache.set("a", 1);
        tokio::time::advance(Duration::from_millis(10)).await;
        cache.set("b", 2);
        tokio::time::advance(Duration::from_millis(10)).await;
        cache.set("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a", TTL), None);
        assert_eq!(cache.get("b", TTL), Some(2));
        assert_eq!(cache.get("c", TTL), Some(3));

        // Overwriting an existing key never evicts
        cache.set("b", 20);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("c", TTL), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired() {
        let cache = TtlCache::new();
        cache.set("old", 1);
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.set("new", 2);

        assert_eq!(cache.sweep(TTL), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new", TTL), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_and_shuts_down() {
        let cache = Arc::new(TtlCache::new());
        cache.set("k", 1);

        let handle = spawn_sweeper(
            Arc::clone(&cache),
            Duration::from_secs(60),
            Duration::from_secs(30),
            "test",
        );

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert!(cache.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_access_on_distinct_keys() {
        let cache = Arc::new(TtlCache::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let key = news_key(&format!("p{}", i));
                for n in 0..100 {
                    cache.set(key.clone(), n);
                    assert!(cache.get(&key, TTL).is_some());
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len(), 8);
        assert_eq!(cache.get("news:p3", TTL), Some(99));
    }

    #[test]
    fn test_keys() {
        assert_eq!(news_key("v2ex"), "news:v2ex");
        assert_eq!(summary_key("tech"), "ai:tech");

        #[derive(Serialize)]
        struct Opts {
            width: Option<u32>,
            quality: u8,
        }
        let a = image_key("https://x/a.png", &Opts { width: Some(100), quality: 80 });
        let b = image_key("https://x/a.png", &Opts { width: Some(200), quality: 80 });
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert_eq!(a, image_key("https://x/a.png", &Opts { width: Some(100), quality: 80 }));
    }
}
