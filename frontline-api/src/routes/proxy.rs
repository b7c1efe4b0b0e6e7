//! Image proxy endpoint

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use frontline_core::ApiResponse;
use frontline_services::ProxyRequest;
use serde::Deserialize;

use super::{envelope, rejected_query};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
    pub w: Option<String>,
    pub h: Option<String>,
    pub q: Option<String>,
    pub fmt: Option<String>,
    pub cache: Option<String>,
    pub t: Option<String>,
}

impl From<ImageQuery> for ProxyRequest {
    fn from(q: ImageQuery) -> Self {
        ProxyRequest {
            url: q.url,
            width: q.w,
            height: q.h,
            quality: q.q,
            format: q.fmt,
            cache: q.cache,
            timestamp: q.t,
        }
    }
}

/// GET /proxy/image?url=..&w=&h=&q=&fmt=&cache=&t=
async fn proxy_image(
    State(state): State<AppState>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> Response {
    let request = match query {
        Ok(Query(params)) => ProxyRequest::from(params),
        Err(rejection) => return rejected_query(rejection),
    };

    match state.images.proxy(&request).await {
        Ok(proxied) => {
            let ttl = state.images.config().cache_ttl.as_secs();
            let max_age = format!("public, max-age={}", ttl);
            let cache_control = HeaderValue::from_str(&max_age)
                .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=86400"));

            (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(proxied.image.content_type),
                    ),
                    (header::CACHE_CONTROL, cache_control),
                    (
                        header::HeaderName::from_static("x-cache"),
                        HeaderValue::from_static(proxied.cache.as_str()),
                    ),
                ],
                Body::from(proxied.image.body),
            )
                .into_response()
        }
        Err(e) => envelope(ApiResponse::<()>::from(e)),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/proxy/image", get(proxy_image))
}
