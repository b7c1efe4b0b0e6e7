//! Frontline news aggregator HTTP API
//!
//! The router is built here so the binary and the HTTP tests share it.

pub mod config;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    Router,
};
use frontline_services::{
    ImageProxy, ImageSource, NewsAggregator, PlaceholderGenerator, PlatformRegistry,
    SummaryService,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<NewsAggregator>,
    pub summaries: Arc<SummaryService>,
    pub images: Arc<ImageProxy>,
}

impl AppState {
    /// Wire the services around an already populated registry
    pub fn new(
        config: &AppConfig,
        registry: PlatformRegistry,
        image_source: Arc<dyn ImageSource>,
    ) -> Self {
        let aggregator = NewsAggregator::new(Arc::new(registry), config.news.clone());
        let summaries = SummaryService::new(
            Arc::new(PlaceholderGenerator),
            config.summary_cache_ttl,
            config.summary_timeout,
        );
        let images = ImageProxy::new(image_source, config.image.clone());

        Self {
            aggregator: Arc::new(aggregator),
            summaries: Arc::new(summaries),
            images: Arc::new(images),
        }
    }
}

/// Build the full router, served both at the root and under `/api`
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(routes::api_routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
