//! News aggregation endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderValue,
    response::Response,
    routing::get,
    Router,
};
use frontline_core::{ApiResponse, FeedError, NewsItem, SortOrder};
use frontline_services::NewsRequest;
use serde::Deserialize;
use tracing::error;

use super::{envelope, rejected_query};
use crate::AppState;

/// Query parameters for `/news`
///
/// The client's `_t` cache buster is left to serde's unknown-field handling.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub platform: Option<String>,
    /// `asc` or `desc` by item date
    pub order: Option<String>,
}

fn parse_order(raw: Option<&str>) -> Result<Option<SortOrder>, FeedError> {
    match raw.map(str::trim).filter(|o| !o.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<SortOrder>()
            .map(Some)
            .map_err(FeedError::invalid_request),
    }
}

/// GET /news?platform=<key>[&order=asc|desc][&_t=..]
async fn get_news(
    State(state): State<AppState>,
    query: Result<Query<NewsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected_query(rejection),
    };

    let order = match parse_order(params.order.as_deref()) {
        Ok(order) => order,
        Err(e) => return envelope(ApiResponse::<Vec<NewsItem>>::from(e)),
    };

    let request = NewsRequest {
        platform: params.platform,
        order,
    };

    match state.aggregator.fetch_news(&request).await {
        Ok(listing) => {
            let mut response = envelope(ApiResponse::success(listing.items));
            response.headers_mut().insert(
                "x-cache",
                HeaderValue::from_static(listing.cache.as_str()),
            );
            response
        }
        Err(e) => {
            if matches!(e, FeedError::Internal(_)) {
                error!("Failed to serve news: {}", e);
            }
            envelope(ApiResponse::<Vec<NewsItem>>::from(e))
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/news", get(get_news))
}
