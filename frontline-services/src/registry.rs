//! Platform registry
//!
//! Maps a platform key to its [`SourceAdapter`]. Populated once at startup,
//! then shared read-only behind an `Arc`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use frontline_core::{FeedError, FeedResult};
use frontline_sources::SourceAdapter;
use tracing::debug;

#[derive(Default)]
pub struct PlatformRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(key, adapter)` pairs, failing on the first duplicate
    pub fn from_adapters<K, I>(adapters: I) -> FeedResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Arc<dyn SourceAdapter>)>,
    {
        let mut registry = Self::new();
        for (key, adapter) in adapters {
            registry.register(key, adapter)?;
        }
        Ok(registry)
    }

    /// Register an adapter under `key`
    ///
    /// Registering the same key twice is a configuration error and leaves the
    /// first registration in place.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        adapter: Arc<dyn SourceAdapter>,
    ) -> FeedResult<()> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(FeedError::config("platform key must not be empty"));
        }
        if self.adapters.contains_key(&key) {
            return Err(FeedError::config(format!(
                "platform '{}' is already registered",
                key
            )));
        }

        debug!("Registered platform adapter: {}", key);
        self.adapters.insert(key, adapter);
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> FeedResult<Arc<dyn SourceAdapter>> {
        self.adapters
            .get(key)
            .cloned()
            .ok_or_else(|| FeedError::unknown_platform(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.adapters.contains_key(key)
    }

    /// Registered keys, sorted
    pub fn registered(&self) -> BTreeSet<String> {
        self.adapters.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontline_core::NewsItem;
    use frontline_sources::{adapter_fn, SourceQuery};

    fn titled(title: &'static str) -> Arc<dyn SourceAdapter> {
        adapter_fn(move |_q: SourceQuery| async move {
            Ok(vec![NewsItem::new("1", title, "https://example.com/1")])
        })
    }

    #[tokio::test]
    async fn test_lookup_returns_registered_adapter() {
        let mut registry = PlatformRegistry::new();
        registry.register("demo", titled("first")).unwrap();

        let adapter = registry.lookup("demo").unwrap();
        let items = adapter.fetch(&SourceQuery::for_platform("demo")).await.unwrap();
        assert_eq!(items[0].title, "first");
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let mut registry = PlatformRegistry::new();
        registry.register("demo", titled("first")).unwrap();

        let err = registry.register("demo", titled("second")).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));

        // First registration is untouched
        let adapter = registry.lookup("demo").unwrap();
        let items = adapter.fetch(&SourceQuery::for_platform("demo")).await.unwrap();
        assert_eq!(items[0].title, "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_platform() {
        let registry = PlatformRegistry::new();
        let err = registry.lookup("doesnotexist").err().unwrap();
        assert_eq!(err, FeedError::unknown_platform("doesnotexist"));
        assert_eq!(err.code(), 404);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut registry = PlatformRegistry::new();
        assert!(registry.register("  ", titled("x")).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_adapters_and_registered() {
        let registry =
            PlatformRegistry::from_adapters([("b", titled("b")), ("a", titled("a"))]).unwrap();
        let keys: Vec<_> = registry.registered().into_iter().collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(registry.contains("a"));

        assert!(PlatformRegistry::from_adapters([("a", titled("1")), ("a", titled("2"))]).is_err());
    }
}
