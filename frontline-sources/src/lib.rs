//! Source adapters for the Frontline news aggregator
//!
//! This crate provides:
//! - The adapter contract every platform implements ([`SourceAdapter`])
//! - Normalization helpers shared by adapters (validation, ordering, dates)
//! - A shared HTTP fetcher with a bounded timeout
//! - A representative set of built-in adapters

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;

pub use adapter::{adapter_fn, FnAdapter, SourceAdapter, SourceQuery};
pub use adapters::builtin_adapters;
pub use config::SourceEndpoints;
pub use error::SourceError;
pub use http::HttpFetcher;
