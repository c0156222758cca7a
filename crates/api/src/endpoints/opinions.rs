//! Opinion endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use voxpop_common::AppResult;
use voxpop_core::{CreateCommentInput, CreateOpinionInput, OpinionView, UpdateOpinionInput};
use voxpop_db::entities::{comment::SubjectType, opinion, reaction::ReactionKind};

use super::{Pagination, comments::CommentResponse};
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Opinion representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionResponse {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_id: Option<String>,
    pub title: String,
    pub body: String,
    pub like_count: i32,
    pub dislike_count: i32,
    pub comment_count: i32,
    pub version: i32,
    pub created_at: String,
}

impl From<opinion::Model> for OpinionResponse {
    fn from(opinion: opinion::Model) -> Self {
        Self {
            id: opinion.id,
            user_id: opinion.user_id,
            poll_id: opinion.poll_id,
            title: opinion.title,
            body: opinion.body,
            like_count: opinion.like_count,
            dislike_count: opinion.dislike_count,
            comment_count: opinion.comment_count,
            version: opinion.version,
            created_at: opinion.created_at.to_rfc3339(),
        }
    }
}

/// An opinion with the viewer's current reaction.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionViewResponse {
    #[serde(flatten)]
    pub opinion: OpinionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_reaction: Option<ReactionKind>,
}

impl From<OpinionView> for OpinionViewResponse {
    fn from(view: OpinionView) -> Self {
        Self {
            opinion: view.opinion.into(),
            viewer_reaction: view.viewer_reaction,
        }
    }
}

/// List opinions, newest first.
async fn list_opinions(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<OpinionResponse>>> {
    let opinions = state
        .opinion_service
        .list_opinions(page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        opinions.into_iter().map(Into::into).collect(),
    ))
}

/// Post an opinion.
async fn create_opinion(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOpinionInput>,
) -> AppResult<ApiResponse<OpinionResponse>> {
    let opinion = state.opinion_service.create_opinion(&user.id, input).await?;
    Ok(ApiResponse::ok(opinion.into()))
}

/// Get an opinion.
async fn get_opinion(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OpinionViewResponse>> {
    let can_moderate = viewer.as_ref().is_some_and(|u| u.can_moderate());
    let viewer_id = viewer.map(|u| u.id);
    let view = state
        .opinion_service
        .get_opinion(&id, viewer_id.as_deref(), can_moderate)
        .await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Edit an opinion.
async fn update_opinion(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOpinionInput>,
) -> AppResult<ApiResponse<OpinionResponse>> {
    let opinion = state
        .opinion_service
        .update_opinion(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(opinion.into()))
}

/// Delete an opinion.
async fn delete_opinion(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .opinion_service
        .delete_opinion(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(crate::response::ok())
}

/// Reaction request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReactionRequest {
    kind: ReactionKind,
}

/// Like or dislike an opinion. Repeating a reaction removes it.
async fn react(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReactionRequest>,
) -> AppResult<ApiResponse<OpinionViewResponse>> {
    let view = state.opinion_service.react(&user.id, &id, req.kind).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Comments on an opinion.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list_comments(SubjectType::Opinion, &id, page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Comment on an opinion.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .create_comment(&user.id, SubjectType::Opinion, &id, input)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_opinions).post(create_opinion))
        .route(
            "/{id}",
            get(get_opinion).patch(update_opinion).delete(delete_opinion),
        )
        .route("/{id}/reactions", post(react))
        .route("/{id}/comments", get(list_comments).post(create_comment))
}
