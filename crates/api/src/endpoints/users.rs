//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Serialize;
use voxpop_common::AppResult;
use voxpop_core::{ChangePasswordInput, UpdateProfileInput};
use voxpop_db::{entities::user, repositories::PollListFilter};

use super::{Pagination, groups::GroupResponse, opinions::OpinionResponse, polls::PollResponse};
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public user representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub polls_count: i32,
    pub opinions_count: i32,
    pub comments_count: i32,
    pub is_moderator: bool,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            polls_count: user.polls_count,
            opinions_count: user.opinions_count,
            comments_count: user.comments_count,
            is_moderator: user.is_moderator,
            is_admin: user.is_admin,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// The authenticated user's own account, including private fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub interests: serde_json::Value,
}

/// Get the authenticated user's account.
async fn get_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MeResponse>> {
    let profile = state.user_service.get_profile(&user.id).await?;
    let email = user.email.clone();

    Ok(ApiResponse::ok(MeResponse {
        user: user.into(),
        email,
        bio: profile.bio,
        location: profile.location,
        website: profile.website,
        interests: profile.interests,
    }))
}

/// Update the authenticated user's profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<MeResponse>> {
    let user = state.user_service.update_profile(&user.id, input).await?;
    let profile = state.user_service.get_profile(&user.id).await?;
    let email = user.email.clone();

    Ok(ApiResponse::ok(MeResponse {
        user: user.into(),
        email,
        bio: profile.bio,
        location: profile.location,
        website: profile.website,
        interests: profile.interests,
    }))
}

/// Change the authenticated user's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.change_password(&user.id, input).await?;
    Ok(crate::response::ok())
}

/// Get a user by ID.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_user(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Get a user by username.
async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_user_by_username(&username).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Polls created by a user.
async fn list_user_polls(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PollResponse>>> {
    // 404s when the user does not exist
    state.user_service.get_user(&id).await?;

    let filter = PollListFilter {
        user_id: Some(id),
        ..Default::default()
    };
    let polls = state
        .poll_service
        .list_polls(&filter, page.limit, page.offset)
        .await?;

    Ok(ApiResponse::ok(
        polls.into_iter().map(Into::into).collect(),
    ))
}

/// Opinions posted by a user.
async fn list_user_opinions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<OpinionResponse>>> {
    state.user_service.get_user(&id).await?;

    let opinions = state
        .opinion_service
        .list_for_user(&id, page.limit, page.offset)
        .await?;

    Ok(ApiResponse::ok(
        opinions.into_iter().map(Into::into).collect(),
    ))
}

/// Groups a user belongs to.
async fn list_user_groups(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<GroupResponse>>> {
    state.user_service.get_user(&id).await?;

    let groups = state.group_service.list_for_user(&id).await?;

    Ok(ApiResponse::ok(
        groups.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/me/password", put(change_password))
        .route("/{id}", get(get_user))
        .route("/by-username/{username}", get(get_user_by_username))
        .route("/{id}/polls", get(list_user_polls))
        .route("/{id}/opinions", get(list_user_opinions))
        .route("/{id}/groups", get(list_user_groups))
}
