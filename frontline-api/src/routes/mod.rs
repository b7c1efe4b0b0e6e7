//! API route definitions

mod health;
mod news;
mod platforms;
mod proxy;
mod summary;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use frontline_core::{ApiResponse, FeedError};
use serde::Serialize;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(platforms::routes())
        .merge(news::routes())
        .merge(summary::routes())
        .merge(proxy::routes())
}

/// Serialize an envelope with its `code` mirrored as the HTTP status
pub(crate) fn envelope<T: Serialize>(response: ApiResponse<T>) -> Response {
    let status =
        StatusCode::from_u16(response.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}

/// Malformed query strings answer with a 400 envelope instead of axum's plain text
pub(crate) fn rejected_query(rejection: QueryRejection) -> Response {
    envelope(ApiResponse::<()>::from(FeedError::invalid_request(
        rejection.body_text(),
    )))
}
