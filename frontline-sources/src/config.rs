//! Upstream endpoint configuration
//!
//! Every adapter's upstream URL can be redirected through an environment
//! variable without code changes. Unset or blank variables fall back to the
//! public endpoint.

use std::env;

/// Use `raw`, falling back to `default` when unset or blank
fn endpoint(raw: Option<String>, default: &str) -> String {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Upstream URLs for the built-in adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
    /// JSON feed root, channels are appended as `/{channel}.json`
    pub v2ex_api: String,
    /// Channel root, lists live at `{root}{channel}/list.json`
    pub cankaoxiaoxi_api: String,
    pub toutiao_api: String,
    /// Prefix joined with the cluster id to build article links
    pub toutiao_prefix: String,
    pub github_base: String,
    pub github_trending_api: String,
    pub kr36_api: String,
    pub kr36_base: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            v2ex_api: "https://www.v2ex.com/feed".to_string(),
            cankaoxiaoxi_api: "https://china.cankaoxiaoxi.com/json/channel/".to_string(),
            toutiao_api: "https://www.toutiao.com/hot-event/hot-board/?origin=toutiao_pc"
                .to_string(),
            toutiao_prefix: "https://www.toutiao.com/trending/".to_string(),
            github_base: "https://github.com".to_string(),
            github_trending_api: "https://github.com/trending?spoken_language_code=".to_string(),
            kr36_api: "https://36kr.com/newsflashes".to_string(),
            kr36_base: "https://36kr.com".to_string(),
        }
    }
}

impl SourceEndpoints {
    /// Load endpoints from the environment
    ///
    /// Recognized variables: `V2EX_API`, `CANKAOXIAOXI_API`, `TOUTIAO_API`,
    /// `TOUTIAO_PREFIX`, `GITHUB_API`, `GITHUB_TRENDING_API`, `_36KR_API`,
    /// `_36KR_BASE_API`.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let url = |var: &str, default: &str| endpoint(lookup(var), default);
        Self {
            v2ex_api: url("V2EX_API", &d.v2ex_api),
            cankaoxiaoxi_api: url("CANKAOXIAOXI_API", &d.cankaoxiaoxi_api),
            toutiao_api: url("TOUTIAO_API", &d.toutiao_api),
            toutiao_prefix: url("TOUTIAO_PREFIX", &d.toutiao_prefix),
            github_base: url("GITHUB_API", &d.github_base),
            github_trending_api: url("GITHUB_TRENDING_API", &d.github_trending_api),
            kr36_api: url("_36KR_API", &d.kr36_api),
            kr36_base: url("_36KR_BASE_API", &d.kr36_base),
        }
    }
}
