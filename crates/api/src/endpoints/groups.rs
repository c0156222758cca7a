//! Group endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use voxpop_common::{AppError, AppResult};
use voxpop_core::{CreateGroupInput, UpdateGroupInput};
use voxpop_db::{
    entities::{group, group_member, group_member::GroupRole},
    repositories::PollListFilter,
};

use super::{Pagination, polls::PollResponse};
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Group representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_private: bool,
    pub member_count: i32,
    pub poll_count: i32,
    pub created_at: String,
}

impl From<group::Model> for GroupResponse {
    fn from(group: group::Model) -> Self {
        Self {
            id: group.id,
            user_id: group.user_id,
            name: group.name,
            description: group.description,
            avatar_url: group.avatar_url,
            is_private: group.is_private,
            member_count: group.member_count,
            poll_count: group.poll_count,
            created_at: group.created_at.to_rfc3339(),
        }
    }
}

/// Group membership representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberResponse {
    pub user_id: String,
    pub role: GroupRole,
    pub joined_at: String,
}

impl From<group_member::Model> for GroupMemberResponse {
    fn from(member: group_member::Model) -> Self {
        Self {
            user_id: member.user_id,
            role: member.role,
            joined_at: member.created_at.to_rfc3339(),
        }
    }
}

/// List public groups.
async fn list_groups(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<GroupResponse>>> {
    let groups = state.group_service.list_groups(page.limit, page.offset).await?;
    Ok(ApiResponse::ok(
        groups.into_iter().map(Into::into).collect(),
    ))
}

/// Create a group. The creator becomes its admin.
async fn create_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGroupInput>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.create_group(&user.id, input).await?;
    Ok(ApiResponse::ok(group.into()))
}

/// Get a group.
async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.get_group(&id).await?;
    Ok(ApiResponse::ok(group.into()))
}

/// Update a group (group admins only).
async fn update_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateGroupInput>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.update_group(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(group.into()))
}

/// Delete a group (site moderators only).
async fn delete_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .group_service
        .delete_group(&user.id, user.can_moderate(), &id)
        .await?;
    Ok(crate::response::ok())
}

/// Join a group.
async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<GroupMemberResponse>> {
    let member = state.group_service.join(&user.id, &id).await?;
    Ok(ApiResponse::ok(member.into()))
}

/// Leave a group.
async fn leave(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.group_service.leave(&user.id, &id).await?;
    Ok(crate::response::ok())
}

/// Group members, admins first.
async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<GroupMemberResponse>>> {
    let members = state
        .group_service
        .list_members(&id, page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        members.into_iter().map(Into::into).collect(),
    ))
}

/// Role change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetRoleRequest {
    role: GroupRole,
}

/// Change a member's role (group admins only).
async fn set_member_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
    Json(req): Json<SetRoleRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state
        .group_service
        .set_member_role(&user.id, &id, &user_id, req.role)
        .await?;
    Ok(crate::response::ok())
}

/// Polls posted into a group. Private groups require membership.
async fn list_polls(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PollResponse>>> {
    let group = state.group_service.get_group(&id).await?;

    if group.is_private {
        let is_member = match viewer {
            Some(ref user) => {
                user.can_moderate() || state.group_service.is_member(&id, &user.id).await?
            }
            None => false,
        };
        if !is_member {
            return Err(AppError::Forbidden(
                "This group is private".to_string(),
            ));
        }
    }

    let filter = PollListFilter {
        group_id: Some(id),
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

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route(
            "/{id}",
            get(get_group).patch(update_group).delete(delete_group),
        )
        .route("/{id}/join", post(join))
        .route("/{id}/leave", post(leave))
        .route("/{id}/members", get(list_members))
        .route("/{id}/members/{user_id}/role", put(set_member_role))
        .route("/{id}/polls", get(list_polls))
}
