//! Platform catalog endpoint

use axum::{
    extract::{rejection::QueryRejection, Query},
    response::Response,
    routing::get,
    Router,
};
use frontline_core::{
    builtin_platforms, platforms_by_category, ApiResponse, Category, FeedError, Platform,
};
use serde::Deserialize;

use super::{envelope, rejected_query};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlatformsQuery {
    /// Restrict the list to one category
    pub category: Option<String>,
}

/// GET /platforms - static catalog, optionally filtered by category
async fn list_platforms(query: Result<Query<PlatformsQuery>, QueryRejection>) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected_query(rejection),
    };

    let category = params.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let platforms = match category {
        None => builtin_platforms(),
        Some(raw) => match raw.parse::<Category>() {
            Ok(category) => platforms_by_category(category),
            Err(e) => {
                return envelope(ApiResponse::<Vec<Platform>>::from(
                    FeedError::invalid_request(e),
                ))
            }
        },
    };

    envelope(ApiResponse::success(platforms))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/platforms", get(list_platforms))
}
