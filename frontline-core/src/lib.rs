//! Core types for the Frontline news aggregator
//!
//! This crate defines the shared data structures used across the workspace:
//! the canonical news item, platform descriptors, the response envelope and
//! the error taxonomy every HTTP endpoint reports through.

pub mod catalog;
pub mod error;
pub mod news;
pub mod platform;
pub mod response;
pub mod summary;

pub use catalog::{builtin_platforms, find_platform, platforms_by_category};
pub use error::{FeedError, FeedResult};
pub use news::{
    CommentField, CommentPreview, NewsExtra, NewsIcon, NewsItem, NewsRating, NewsThumbnail,
    NewsVideo, SortOrder,
};
pub use platform::{Category, Platform};
pub use response::ApiResponse;
pub use summary::{AISection, AISummaryData, HotTopic, Trend};
