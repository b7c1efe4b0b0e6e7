//! The contract every platform adapter satisfies
//!
//! An adapter is an opaque unit: given the request parameters it fetches its
//! upstream and returns normalized [`NewsItem`]s, or fails. It is never retried
//! by the caller, and the caller bounds how long it may take.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use frontline_core::NewsItem;

use crate::error::SourceError;

/// Parameters passed through to an adapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceQuery {
    /// Platform key the adapter was looked up by
    pub platform: String,
    /// Extra request parameters, forwarded verbatim
    pub params: BTreeMap<String, String>,
}

impl SourceQuery {
    pub fn for_platform(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Fetch + normalize routine for one platform
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError>;
}

/// Adapter backed by a closure returning a future
pub struct FnAdapter<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> SourceAdapter for FnAdapter<F>
where
    F: Fn(SourceQuery) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<NewsItem>, SourceError>> + Send + 'static,
{
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<NewsItem>, SourceError> {
        (self.f)(query.clone()).await
    }
}

/// Wrap a closure as a shareable adapter
///
/// ```ignore
/// let demo = adapter_fn(|_| async {
///     Ok(vec![NewsItem::new("1", "T", "https://x")])
/// });
/// ```
pub fn adapter_fn<F, Fut>(f: F) -> Arc<dyn SourceAdapter>
where
    F: Fn(SourceQuery) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<NewsItem>, SourceError>> + Send + 'static,
{
    Arc::new(FnAdapter { f })
}
