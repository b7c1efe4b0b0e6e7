//! Shared HTTP fetcher used by adapters and the image proxy

use std::time::Duration;

use rand::Rng;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SourceError;

/// Default per-request timeout for upstream fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// Pick a browser user agent; several upstreams reject obvious bots
pub fn random_user_agent() -> &'static str {
    let idx = rand::rng().random_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Body fetched as raw bytes
#[derive(Debug, Clone)]
pub struct FetchedBytes {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Cheaply cloneable HTTP client wrapper
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default 10s timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::ApiError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("upstream error")
                    .to_string(),
            });
        }

        Ok(response)
    }

    /// Fetch a body as text
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))
    }

    /// Fetch and deserialize a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body)
            .map_err(|e| SourceError::ParseError(format!("{}: {}", url, e)))
    }

    /// Fetch a binary body, refusing anything larger than `max_bytes`
    ///
    /// The body is read chunk by chunk so a response without a
    /// `Content-Length` is cut off as soon as it passes the limit.
    pub async fn get_bytes(
        &self,
        url: &str,
        max_bytes: usize,
    ) -> Result<FetchedBytes, SourceError> {
        let mut response = self.send(url).await?;

        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return Err(SourceError::PayloadTooLarge { limit: max_bytes });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?
        {
            if body.len() + chunk.len() > max_bytes {
                debug!("Aborted {} after {} bytes", url, body.len());
                return Err(SourceError::PayloadTooLarge { limit: max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedBytes { body, content_type })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one chunked response (no Content-Length) made of `chunks` x 8 bytes
    async fn serve_chunked(chunks: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut raw = String::from(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\
             Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
        );
        for _ in 0..chunks {
            raw.push_str("8\r\n12345678\r\n");
        }
        raw.push_str("0\r\n\r\n");

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/image.png", addr)
    }

    #[tokio::test]
    async fn test_get_bytes_caps_chunked_body() {
        let url = serve_chunked(4).await;
        let err = HttpFetcher::new().get_bytes(&url, 16).await.unwrap_err();
        assert!(matches!(err, SourceError::PayloadTooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn test_get_bytes_within_limit() {
        let url = serve_chunked(3).await;
        let fetched = HttpFetcher::new().get_bytes(&url, 64).await.unwrap();
        assert_eq!(fetched.body.len(), 24);
        assert_eq!(fetched.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_random_user_agent_is_browser_like() {
        for _ in 0..20 {
            assert!(random_user_agent().starts_with("Mozilla/5.0"));
        }
    }
}
