//! Forum thread endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use voxpop_common::AppResult;
use voxpop_core::{CreateCommentInput, UpdateThreadInput};
use voxpop_db::entities::{comment::SubjectType, thread};

use super::{Pagination, comments::CommentResponse};
use crate::{
    extractors::{AuthUser, ModeratorUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Thread representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub id: String,
    pub forum_id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub comment_count: i32,
    pub view_count: i32,
    pub last_activity_at: String,
    pub version: i32,
    pub created_at: String,
}

impl From<thread::Model> for ThreadResponse {
    fn from(thread: thread::Model) -> Self {
        Self {
            id: thread.id,
            forum_id: thread.forum_id,
            user_id: thread.user_id,
            title: thread.title,
            body: thread.body,
            is_pinned: thread.is_pinned,
            is_locked: thread.is_locked,
            comment_count: thread.comment_count,
            view_count: thread.view_count,
            last_activity_at: thread.last_activity_at.to_rfc3339(),
            version: thread.version,
            created_at: thread.created_at.to_rfc3339(),
        }
    }
}

/// Get a thread. Counts the view.
async fn get_thread(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ThreadResponse>> {
    let thread = state.forum_service.get_thread(&id).await?;
    Ok(ApiResponse::ok(thread.into()))
}

/// Edit a thread.
async fn update_thread(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateThreadInput>,
) -> AppResult<ApiResponse<ThreadResponse>> {
    let thread = state
        .forum_service
        .update_thread(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(thread.into()))
}

/// Delete a thread.
async fn delete_thread(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .forum_service
        .delete_thread(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(crate::response::ok())
}

/// Pin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinRequest {
    pinned: bool,
}

/// Pin or unpin a thread (moderators only).
async fn set_pinned(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PinRequest>,
) -> AppResult<ApiResponse<ThreadResponse>> {
    let thread = state.forum_service.set_pinned(&id, req.pinned).await?;
    Ok(ApiResponse::ok(thread.into()))
}

/// Lock request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockRequest {
    locked: bool,
}

/// Lock or unlock a thread (moderators only).
async fn set_locked(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LockRequest>,
) -> AppResult<ApiResponse<ThreadResponse>> {
    let thread = state.forum_service.set_locked(&id, req.locked).await?;
    Ok(ApiResponse::ok(thread.into()))
}

/// Comments in a thread.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list_comments(SubjectType::Thread, &id, page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Comment in a thread.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .create_comment(&user.id, SubjectType::Thread, &id, input)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(get_thread).patch(update_thread).delete(delete_thread),
        )
        .route("/{id}/pin", post(set_pinned))
        .route("/{id}/lock", post(set_locked))
        .route("/{id}/comments", get(list_comments).post(create_comment))
}
