//! AI summary endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
    routing::get,
    Router,
};
use frontline_core::{AISummaryData, ApiResponse};
use serde::Deserialize;

use super::{envelope, rejected_query};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub category: Option<String>,
}

/// GET /news/ai?category=<key>
async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected_query(rejection),
    };
    let result = state.summaries.summarize(params.category.as_deref()).await;
    envelope(ApiResponse::<AISummaryData>::from(result))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/news/ai", get(get_summary))
}
