//! Forum endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use voxpop_common::AppResult;
use voxpop_core::{CreateForumInput, CreateThreadInput};
use voxpop_db::entities::forum;

use super::threads::ThreadResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Forum representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub is_public: bool,
    pub thread_count: i32,
    pub created_at: String,
}

impl From<forum::Model> for ForumResponse {
    fn from(forum: forum::Model) -> Self {
        Self {
            id: forum.id,
            user_id: forum.user_id,
            name: forum.name,
            description: forum.description,
            category: forum.category,
            is_public: forum.is_public,
            thread_count: forum.thread_count,
            created_at: forum.created_at.to_rfc3339(),
        }
    }
}

/// Forum listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListForumsQuery {
    category: Option<String>,
    #[serde(default = "super::default_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

/// List public forums.
async fn list_forums(
    State(state): State<AppState>,
    Query(query): Query<ListForumsQuery>,
) -> AppResult<ApiResponse<Vec<ForumResponse>>> {
    let forums = state
        .forum_service
        .list_forums(query.category.as_deref(), query.limit, query.offset)
        .await?;
    Ok(ApiResponse::ok(
        forums.into_iter().map(Into::into).collect(),
    ))
}

/// Create a forum.
async fn create_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateForumInput>,
) -> AppResult<ApiResponse<ForumResponse>> {
    let forum = state.forum_service.create_forum(&user.id, input).await?;
    Ok(ApiResponse::ok(forum.into()))
}

/// Get a forum.
async fn get_forum(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ForumResponse>> {
    let forum = state.forum_service.get_forum(&id).await?;
    Ok(ApiResponse::ok(forum.into()))
}

/// Delete a forum.
async fn delete_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .forum_service
        .delete_forum(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(crate::response::ok())
}

/// Threads in a forum, pinned first.
async fn list_threads(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<super::Pagination>,
) -> AppResult<ApiResponse<Vec<ThreadResponse>>> {
    let threads = state
        .forum_service
        .list_threads(&id, page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        threads.into_iter().map(Into::into).collect(),
    ))
}

/// Start a thread in a forum.
async fn create_thread(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateThreadInput>,
) -> AppResult<ApiResponse<ThreadResponse>> {
    let thread = state
        .forum_service
        .create_thread(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(thread.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_forums).post(create_forum))
        .route("/{id}", get(get_forum).delete(delete_forum))
        .route("/{id}/threads", get(list_threads).post(create_thread))
}
