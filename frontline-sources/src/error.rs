//! Error types for source adapters

use thiserror::Error;

/// Errors an adapter may raise while fetching or parsing
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Upstream returned a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Failed to parse the upstream payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response body exceeded the allowed size
    #[error("Payload too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
