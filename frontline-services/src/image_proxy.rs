//! Image proxy
//!
//! Fetches a remote image, optionally resizes and re-encodes it, and keeps
//! the result in a bounded [`TtlCache`] for a day. Cache keys hash the source
//! URL together with the transform options.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use frontline_core::{FeedError, FeedResult};
use frontline_sources::http::FetchedBytes;
use frontline_sources::{HttpFetcher, SourceError};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::aggregator::CacheStatus;
use crate::cache::{image_key, CacheStats, TtlCache};

/// Proxied images stay fresh for a day
pub const IMAGE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub const IMAGE_CACHE_MAX_ENTRIES: usize = 512;

/// Largest upstream image accepted (10 MiB)
pub const IMAGE_MAX_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_QUALITY: u8 = 80;

/// How old a signed request timestamp may be
const TOKEN_WINDOW_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Gif => "gif",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            "gif" => Ok(ImageFormat::Gif),
            _ => Err(format!("Unsupported image format: {}", s)),
        }
    }
}

/// Sniff the format from magic bytes, falling back to JPEG
pub fn detect_format(bytes: &[u8]) -> ImageFormat {
    match bytes {
        [0x47, 0x49, 0x46, ..] => ImageFormat::Gif,
        [0x89, 0x50, 0x4E, 0x47, ..] => ImageFormat::Png,
        [0xFF, 0xD8, ..] => ImageFormat::Jpeg,
        [_, _, _, _, _, _, _, _, 0x57, 0x45, 0x42, 0x50, _, ..] => ImageFormat::Webp,
        _ => ImageFormat::Jpeg,
    }
}

/// Transform options; serialized into the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub quality: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: DEFAULT_QUALITY,
            format: None,
        }
    }
}

impl ImageOptions {
    /// No resize and no format change requested
    pub fn is_identity(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.format.is_none()
    }
}

/// Raw `/proxy/image` query parameters
#[derive(Debug, Clone, Default)]
pub struct ProxyRequest {
    pub url: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub quality: Option<String>,
    pub format: Option<String>,
    pub cache: Option<String>,
    /// Request timestamp in epoch millis, checked when a secret is configured
    pub timestamp: Option<String>,
}

impl ProxyRequest {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    fn options(&self) -> FeedResult<ImageOptions> {
        let dimension = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
        };

        let quality = self
            .quality
            .as_deref()
            .and_then(|q| q.trim().parse::<u32>().ok())
            .map(|q| q.clamp(1, 100) as u8)
            .unwrap_or(DEFAULT_QUALITY);

        let format = match self.format.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<ImageFormat>().map_err(FeedError::invalid_request)?),
        };

        Ok(ImageOptions {
            width: dimension(&self.width),
            height: dimension(&self.height),
            quality,
            format,
        })
    }

    /// Only an absent or literal `true` cache flag uses the cache
    fn use_cache(&self) -> bool {
        matches!(self.cache.as_deref(), None | Some("true"))
    }
}

/// Check the request timestamp against the configured secret
///
/// Without a secret every request passes.
pub fn verify_timestamp(secret: Option<&str>, timestamp: Option<&str>, now_ms: i64) -> bool {
    if secret.is_none_or(str::is_empty) {
        return true;
    }
    match timestamp.and_then(|t| t.trim().parse::<i64>().ok()) {
        Some(t) => now_ms.saturating_sub(t) <= TOKEN_WINDOW_MS,
        None => false,
    }
}

/// Encoded image ready to send
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub body: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub image: ProcessedImage,
    pub cache: CacheStatus,
}

/// Where source images come from
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_image(&self, url: &str, max_bytes: usize) -> Result<FetchedBytes, SourceError>;
}

#[async_trait]
impl ImageSource for HttpFetcher {
    async fn fetch_image(&self, url: &str, max_bytes: usize) -> Result<FetchedBytes, SourceError> {
        self.get_bytes(url, max_bytes).await
    }
}

#[derive(Debug, Clone)]
pub struct ImageProxyConfig {
    pub cache_ttl: Duration,
    pub max_entries: usize,
    pub max_bytes: usize,
    pub secret: Option<String>,
}

impl Default for ImageProxyConfig {
    fn default() -> Self {
        Self {
            cache_ttl: IMAGE_CACHE_TTL,
            max_entries: IMAGE_CACHE_MAX_ENTRIES,
            max_bytes: IMAGE_MAX_BYTES,
            secret: None,
        }
    }
}

pub struct ImageProxy {
    source: Arc<dyn ImageSource>,
    cache: Arc<TtlCache<ProcessedImage>>,
    config: ImageProxyConfig,
}

impl ImageProxy {
    pub fn new(source: Arc<dyn ImageSource>, config: ImageProxyConfig) -> Self {
        Self {
            source,
            cache: Arc::new(TtlCache::bounded(config.max_entries)),
            config,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache<ProcessedImage>> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &ImageProxyConfig {
        &self.config
    }

    pub async fn proxy(&self, request: &ProxyRequest) -> FeedResult<ProxiedImage> {
        let url = request
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| FeedError::invalid_request("缺少 url 参数"))?;

        if !verify_timestamp(
            self.config.secret.as_deref(),
            request.timestamp.as_deref(),
            Utc::now().timestamp_millis(),
        ) {
            return Err(FeedError::forbidden("无效或已过期的请求"));
        }

        let options = request.options()?;
        let use_cache = request.use_cache();
        let key = image_key(url, &options);

        if use_cache {
            if let Some(image) = self.cache.get(&key, self.config.cache_ttl) {
                debug!("Image cache hit for {}", url);
                return Ok(ProxiedImage {
                    image,
                    cache: CacheStatus::Hit,
                });
            }
        }

        let fetched = self
            .source
            .fetch_image(url, self.config.max_bytes)
            .await
            .map_err(|e| match e {
                SourceError::ApiError { status, message } => {
                    warn!("Image upstream returned {} for {}", status, url);
                    FeedError::upstream_status(status, format!("获取图片失败: {}", message))
                }
                other => {
                    warn!("Image fetch failed for {}: {}", url, other);
                    FeedError::upstream("image", other.to_string())
                }
            })?;

        let detected = detect_format(&fetched.body);
        let image = if detected == ImageFormat::Gif && options.is_identity() {
            ProcessedImage {
                body: Bytes::from(fetched.body),
                content_type: ImageFormat::Gif.content_type(),
            }
        } else {
            let body = fetched.body;
            tokio::task::spawn_blocking(move || transcode(&body, &options, detected))
                .await
                .map_err(|e| FeedError::internal(format!("image task failed: {}", e)))?
                .map_err(|e| {
                    error!("Image processing failed for {}: {}", url, e);
                    FeedError::internal("处理图片时发生错误")
                })?
        };

        if use_cache {
            self.cache.set(key, image.clone());
        }

        Ok(ProxiedImage {
            image,
            cache: CacheStatus::Miss,
        })
    }
}

/// Decode, fit inside the requested box without enlarging, and re-encode
pub fn transcode(
    body: &[u8],
    options: &ImageOptions,
    detected: ImageFormat,
) -> Result<ProcessedImage, image::ImageError> {
    let img = image::load_from_memory(body)?;
    let img = fit_inside(img, options.width, options.height);
    let target = options.format.unwrap_or(detected);

    let mut out = Cursor::new(Vec::new());
    match target {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut out, options.quality);
            img.to_rgb8().write_with_encoder(encoder)?;
        }
        ImageFormat::Png => img.write_to(&mut out, image::ImageFormat::Png)?,
        ImageFormat::Webp => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut out, image::ImageFormat::WebP)?
        }
        ImageFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut out, image::ImageFormat::Gif)?
        }
    }

    Ok(ProcessedImage {
        body: Bytes::from(out.into_inner()),
        content_type: target.content_type(),
    })
}

fn fit_inside(img: DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
    if width.is_none() && height.is_none() {
        return img;
    }
    let (w, h) = (img.width(), img.height());
    let max_w = width.unwrap_or(w).min(w);
    let max_h = height.unwrap_or(h).min(h);
    if max_w >= w && max_h >= h {
        return img;
    }
    img.resize(max_w, max_h, FilterType::Lanczos3)
}
