//! Health check endpoints

use axum::{extract::State, response::Json, routing::get, Router};
use frontline_services::CacheStats;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
struct CacheReport {
    news: CacheStats,
    summary: CacheStats,
    image: CacheStats,
}

/// Readiness response
#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    platforms: usize,
    caches: CacheReport,
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

async fn readiness(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ok",
        platforms: state.aggregator.registry().len(),
        caches: CacheReport {
            news: state.aggregator.cache_stats(),
            summary: state.summaries.cache_stats(),
            image: state.images.cache_stats(),
        },
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness))
}
