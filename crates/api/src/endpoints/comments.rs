//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use voxpop_common::AppResult;
use voxpop_core::{CommentView, UpdateCommentInput};
use voxpop_db::entities::{comment, reaction::ReactionKind};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Comment representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub user_id: String,
    pub subject_type: comment::SubjectType,
    pub subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub body: String,
    pub upvote_count: i32,
    pub downvote_count: i32,
    pub reply_count: i32,
    pub version: i32,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            subject_type: comment.subject_type,
            subject_id: comment.subject_id,
            parent_id: comment.parent_id,
            body: comment.body,
            upvote_count: comment.upvote_count,
            downvote_count: comment.downvote_count,
            reply_count: comment.reply_count,
            version: comment.version,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// A comment with the viewer's current reaction.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentViewResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_reaction: Option<ReactionKind>,
}

impl From<CommentView> for CommentViewResponse {
    fn from(view: CommentView) -> Self {
        Self {
            comment: view.comment.into(),
            viewer_reaction: view.viewer_reaction,
        }
    }
}

/// Get a comment.
async fn get_comment(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommentViewResponse>> {
    let viewer_id = viewer.map(|u| u.id);
    let view = state
        .comment_service
        .get_comment(&id, viewer_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Edit a comment.
async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .update_comment(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Delete a comment.
async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .comment_service
        .delete_comment(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(crate::response::ok())
}

/// Direct replies to a comment, oldest first.
async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let replies = state.comment_service.list_replies(&id).await?;
    Ok(ApiResponse::ok(
        replies.into_iter().map(Into::into).collect(),
    ))
}

/// Vote request. `up` and `down` are accepted as aliases.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentVoteRequest {
    kind: ReactionKind,
}

/// Upvote or downvote a comment. Repeating a vote removes it.
async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommentVoteRequest>,
) -> AppResult<ApiResponse<CommentViewResponse>> {
    let view = state.comment_service.react(&user.id, &id, req.kind).await?;
    Ok(ApiResponse::ok(view.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
        .route("/{id}/replies", get(list_replies))
        .route("/{id}/votes", post(vote))
}
