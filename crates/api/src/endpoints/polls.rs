//! Poll endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use voxpop_common::AppResult;
use voxpop_core::{
    CreateCommentInput, CreatePollInput, PollResults, PollView, UpdatePollInput,
};
use voxpop_db::{
    entities::{comment::SubjectType, poll},
    repositories::{PollListFilter, PollSort},
};

use super::{Pagination, comments::CommentResponse, opinions::OpinionResponse};
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Poll representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: serde_json::Value,
    pub allow_multiple_votes: bool,
    pub allow_comments: bool,
    pub is_private: bool,
    pub show_results_before_voting: bool,
    pub is_closed: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub vote_count: i32,
    pub comment_count: i32,
    pub version: i32,
    pub created_at: String,
}

impl From<poll::Model> for PollResponse {
    fn from(poll: poll::Model) -> Self {
        Self {
            id: poll.id,
            user_id: poll.user_id,
            title: poll.title,
            description: poll.description,
            category: poll.category,
            tags: poll.tags,
            allow_multiple_votes: poll.allow_multiple_votes,
            allow_comments: poll.allow_comments,
            is_private: poll.is_private,
            show_results_before_voting: poll.show_results_before_voting,
            is_closed: poll.is_closed,
            is_featured: poll.is_featured,
            expires_at: poll.expires_at.map(|e| e.to_rfc3339()),
            group_id: poll.group_id,
            vote_count: poll.vote_count,
            comment_count: poll.comment_count,
            version: poll.version,
            created_at: poll.created_at.to_rfc3339(),
        }
    }
}

/// One option of a poll.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionResponse {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub position: i32,
    pub vote_count: i32,
}

/// A poll with its options and the viewer's votes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollViewResponse {
    #[serde(flatten)]
    pub poll: PollResponse,
    pub options: Vec<PollOptionResponse>,
    pub viewer_votes: Vec<String>,
    pub is_expired: bool,
}

impl From<PollView> for PollViewResponse {
    fn from(view: PollView) -> Self {
        Self {
            poll: view.poll.into(),
            options: view
                .options
                .into_iter()
                .map(|o| PollOptionResponse {
                    id: o.id,
                    text: o.text,
                    image_url: o.image_url,
                    position: o.position,
                    vote_count: o.vote_count,
                })
                .collect(),
            viewer_votes: view.viewer_votes,
            is_expired: view.is_expired,
        }
    }
}

/// Vote tally for one option.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionResultResponse {
    pub id: String,
    pub text: String,
    pub vote_count: i32,
    pub percentage: f64,
}

/// Aggregated poll results.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResultsResponse {
    pub poll_id: String,
    pub total_votes: i32,
    pub options: Vec<OptionResultResponse>,
}

impl From<PollResults> for PollResultsResponse {
    fn from(results: PollResults) -> Self {
        Self {
            poll_id: results.poll.id,
            total_votes: results.total_votes,
            options: results
                .options
                .into_iter()
                .map(|r| OptionResultResponse {
                    id: r.option.id,
                    text: r.option.text,
                    vote_count: r.option.vote_count,
                    percentage: r.percentage,
                })
                .collect(),
        }
    }
}

/// Poll listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPollsQuery {
    category: Option<String>,
    group_id: Option<String>,
    user_id: Option<String>,
    closed: Option<bool>,
    featured: Option<bool>,
    /// `newest`, `popular`, or `endingSoon`.
    sort: Option<String>,
    #[serde(default = "super::default_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

/// List polls.
async fn list_polls(
    State(state): State<AppState>,
    Query(query): Query<ListPollsQuery>,
) -> AppResult<ApiResponse<Vec<PollResponse>>> {
    let sort = match query.sort.as_deref() {
        Some("popular") => PollSort::Popular,
        Some("endingSoon") => PollSort::EndingSoon,
        _ => PollSort::Newest,
    };

    let filter = PollListFilter {
        user_id: query.user_id,
        category: query.category,
        group_id: query.group_id,
        is_closed: query.closed,
        is_featured: query.featured,
        search: None,
        sort,
    };

    let polls = state
        .poll_service
        .list_polls(&filter, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        polls.into_iter().map(Into::into).collect(),
    ))
}

/// Create a poll.
async fn create_poll(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePollInput>,
) -> AppResult<ApiResponse<PollViewResponse>> {
    let view = state.poll_service.create_poll(&user.id, input).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Trending polls.
async fn trending(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PollResponse>>> {
    let polls = state.poll_service.trending(page.limit).await?;
    Ok(ApiResponse::ok(
        polls.into_iter().map(Into::into).collect(),
    ))
}

/// Get a poll with its options.
async fn get_poll(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PollViewResponse>> {
    let viewer_id = viewer.map(|u| u.id);
    let view = state.poll_service.get_poll(&id, viewer_id.as_deref()).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Update a poll.
async fn update_poll(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePollInput>,
) -> AppResult<ApiResponse<PollResponse>> {
    let poll = state.poll_service.update_poll(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(poll.into()))
}

/// Delete a poll.
async fn delete_poll(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .poll_service
        .delete_poll(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(crate::response::ok())
}

/// Close a poll to further voting.
async fn close_poll(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PollResponse>> {
    let poll = state
        .poll_service
        .close_poll(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(ApiResponse::ok(poll.into()))
}

/// Vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    option_ids: Vec<String>,
}

/// Cast a vote.
async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<PollViewResponse>> {
    let view = state.poll_service.vote(&user.id, &id, &req.option_ids).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Vote tallies for a poll.
async fn results(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PollResultsResponse>> {
    let viewer_id = viewer.map(|u| u.id);
    let results = state.poll_service.results(&id, viewer_id.as_deref()).await?;
    Ok(ApiResponse::ok(results.into()))
}

/// Comments on a poll.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list_comments(SubjectType::Poll, &id, page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Comment on a poll.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .create_comment(&user.id, SubjectType::Poll, &id, input)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Opinions attached to a poll.
async fn list_opinions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<OpinionResponse>>> {
    let opinions = state.opinion_service.list_for_poll(&id).await?;
    Ok(ApiResponse::ok(
        opinions.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_polls).post(create_poll))
        .route("/trending", get(trending))
        .route(
            "/{id}",
            get(get_poll).patch(update_poll).delete(delete_poll),
        )
        .route("/{id}/close", post(close_poll))
        .route("/{id}/votes", post(vote))
        .route("/{id}/results", get(results))
        .route("/{id}/comments", get(list_comments).post(create_comment))
        .route("/{id}/opinions", get(list_opinions))
}
