//! Search endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use voxpop_common::AppResult;

use super::{opinions::OpinionResponse, polls::PollResponse, users::UserResponse};
use crate::{middleware::AppState, response::ApiResponse};

/// Search query.
#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
    #[serde(default = "super::default_limit")]
    limit: u64,
}

/// Search results.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    polls: Vec<PollResponse>,
    opinions: Vec<OpinionResponse>,
    users: Vec<UserResponse>,
}

/// Search polls, opinions, and users.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<SearchResponse>> {
    let results = state.search_service.search(&query.q, query.limit).await?;

    Ok(ApiResponse::ok(SearchResponse {
        polls: results.polls.into_iter().map(Into::into).collect(),
        opinions: results.opinions.into_iter().map(Into::into).collect(),
        users: results.users.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}
