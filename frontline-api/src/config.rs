//! Server configuration from the environment

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use frontline_services::image_proxy::{IMAGE_CACHE_MAX_ENTRIES, IMAGE_CACHE_TTL, IMAGE_MAX_BYTES};
use frontline_services::summary::{SUMMARY_CACHE_TTL, SUMMARY_TIMEOUT};
use frontline_services::{AggregatorConfig, ImageProxyConfig, FETCH_TIMEOUT, NEWS_CACHE_TTL};
use frontline_sources::SourceEndpoints;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 10010;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub news: AggregatorConfig,
    pub summary_cache_ttl: Duration,
    pub summary_timeout: Duration,
    pub image: ImageProxyConfig,
    /// `None` disables the background cache sweepers
    pub sweep_interval: Option<Duration>,
    pub endpoints: SourceEndpoints,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            news: AggregatorConfig::default(),
            summary_cache_ttl: SUMMARY_CACHE_TTL,
            summary_timeout: SUMMARY_TIMEOUT,
            image: ImageProxyConfig::default(),
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
            endpoints: SourceEndpoints::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |var: &str, default: Duration| {
            Duration::from_secs(setting(var, lookup(var), default.as_secs()))
        };

        let sweep_secs = setting(
            "CACHE_SWEEP_INTERVAL_SECS",
            lookup("CACHE_SWEEP_INTERVAL_SECS"),
            DEFAULT_SWEEP_INTERVAL.as_secs(),
        );

        Self {
            port: setting("SERVER_PORT", lookup("SERVER_PORT"), DEFAULT_PORT),
            news: AggregatorConfig {
                cache_ttl: secs("NEWS_CACHE_TTL_SECS", NEWS_CACHE_TTL),
                fetch_timeout: secs("FETCH_TIMEOUT_SECS", FETCH_TIMEOUT),
            },
            summary_cache_ttl: secs("SUMMARY_CACHE_TTL_SECS", SUMMARY_CACHE_TTL),
            summary_timeout: secs("SUMMARY_TIMEOUT_SECS", SUMMARY_TIMEOUT),
            image: ImageProxyConfig {
                cache_ttl: secs("IMAGE_CACHE_TTL_SECS", IMAGE_CACHE_TTL),
                max_entries: setting(
                    "IMAGE_CACHE_MAX_ENTRIES",
                    lookup("IMAGE_CACHE_MAX_ENTRIES"),
                    IMAGE_CACHE_MAX_ENTRIES,
                ),
                max_bytes: setting(
                    "IMAGE_MAX_BYTES",
                    lookup("IMAGE_MAX_BYTES"),
                    IMAGE_MAX_BYTES,
                ),
                secret: lookup("PROXY_SECRET")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            },
            sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
            endpoints: SourceEndpoints::from_lookup(&lookup),
        }
    }
}

/// Parse `raw`, keeping `default` when unset or malformed
fn setting<T>(var: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
{
    let Some(raw) = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Invalid value for {}: {:?}, using default {}", var, raw, default);
            default
        }
    }
}
