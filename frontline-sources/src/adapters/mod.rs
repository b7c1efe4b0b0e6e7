//! Built-in platform adapters
//!
//! | Platform | Module | Upstream shape |
//! |----------|--------|----------------|
//! | `v2ex` | [`v2ex`] | JSON Feed, four channels merged |
//! | `cankaoxiaoxi` | [`cankaoxiaoxi`] | JSON channel lists, three merged |
//! | `toutiao` | [`toutiao`] | JSON hot board |
//! | `github` | [`github`] | HTML trending page |
//! | `_36kr` | [`kr36`] | HTML newsflash page with relative times |
//!
//! Each adapter keeps its parsing in a pure function over the fetched body.

pub mod cankaoxiaoxi;
pub mod github;
pub mod kr36;
pub mod toutiao;
pub mod v2ex;

use std::sync::Arc;

use scraper::Selector;

use crate::adapter::SourceAdapter;
use crate::config::SourceEndpoints;
use crate::error::SourceError;
use crate::http::HttpFetcher;

pub use cankaoxiaoxi::CankaoxiaoxiAdapter;
pub use github::GithubTrendingAdapter;
pub use kr36::Kr36Adapter;
pub use toutiao::ToutiaoAdapter;
pub use v2ex::V2exAdapter;

/// All built-in adapters keyed by platform
pub fn builtin_adapters(
    http: &HttpFetcher,
    endpoints: &SourceEndpoints,
) -> Vec<(&'static str, Arc<dyn SourceAdapter>)> {
    let v2ex: Arc<dyn SourceAdapter> =
        Arc::new(V2exAdapter::new(http.clone(), &endpoints.v2ex_api));
    let cankaoxiaoxi: Arc<dyn SourceAdapter> =
        Arc::new(CankaoxiaoxiAdapter::new(http.clone(), &endpoints.cankaoxiaoxi_api));
    let toutiao: Arc<dyn SourceAdapter> = Arc::new(ToutiaoAdapter::new(
        http.clone(),
        &endpoints.toutiao_api,
        &endpoints.toutiao_prefix,
    ));
    let github: Arc<dyn SourceAdapter> = Arc::new(GithubTrendingAdapter::new(
        http.clone(),
        &endpoints.github_trending_api,
        &endpoints.github_base,
    ));
    let kr36: Arc<dyn SourceAdapter> =
        Arc::new(Kr36Adapter::new(http.clone(), &endpoints.kr36_api, &endpoints.kr36_base));

    vec![
        ("v2ex", v2ex),
        ("cankaoxiaoxi", cankaoxiaoxi),
        ("toutiao", toutiao),
        ("github", github),
        ("_36kr", kr36),
    ]
}

/// Compile a CSS selector, reporting failures as parse errors
pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|e| SourceError::ParseError(format!("invalid selector {}: {:?}", css, e)))
}
