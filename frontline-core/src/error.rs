//! Error types for the aggregator

use thiserror::Error;

/// Aggregator-wide error type
///
/// Every variant maps onto an envelope code via [`FeedError::code`], so the
/// HTTP layer never has to inspect messages to pick a status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Upstream error ({platform}): {message}")]
    Upstream { platform: String, message: String },

    /// Upstream answered with a non-success HTTP status that should be surfaced as-is
    #[error("Upstream status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        FeedError::InvalidRequest(msg.into())
    }

    pub fn unknown_platform(platform: impl Into<String>) -> Self {
        FeedError::UnknownPlatform(platform.into())
    }

    pub fn upstream(platform: impl Into<String>, message: impl Into<String>) -> Self {
        FeedError::Upstream {
            platform: platform.into(),
            message: message.into(),
        }
    }

    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        FeedError::UpstreamStatus {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        FeedError::Forbidden(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        FeedError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        FeedError::Internal(msg.into())
    }

    /// Envelope code for this error
    pub fn code(&self) -> u16 {
        match self {
            FeedError::InvalidRequest(_) => 400,
            FeedError::Forbidden(_) => 403,
            FeedError::UnknownPlatform(_) => 404,
            FeedError::UpstreamStatus { status, .. } if (400..=599).contains(status) => *status,
            FeedError::Upstream { .. }
            | FeedError::UpstreamStatus { .. }
            | FeedError::Config(_)
            | FeedError::Internal(_) => 500,
        }
    }

    /// Whether the failure was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code())
    }
}

/// Result type alias for aggregator operations
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_taxonomy() {
        assert_eq!(FeedError::invalid_request("platform").code(), 400);
        assert_eq!(FeedError::unknown_platform("nope").code(), 404);
        assert_eq!(FeedError::upstream("v2ex", "timeout").code(), 500);
        assert_eq!(FeedError::internal("boom").code(), 500);
        assert_eq!(FeedError::forbidden("expired").code(), 403);
    }

    #[test]
    fn test_upstream_status_passthrough() {
        assert_eq!(FeedError::upstream_status(404, "Not Found").code(), 404);
        assert_eq!(FeedError::upstream_status(503, "busy").code(), 503);
        // Nonsense statuses collapse to a server error
        assert_eq!(FeedError::upstream_status(302, "redirect").code(), 500);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(FeedError::unknown_platform("x").is_client_error());
        assert!(!FeedError::upstream("x", "y").is_client_error());
    }
}
