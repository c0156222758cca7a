//! Moderation and admin endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use voxpop_common::AppResult;
use voxpop_core::{AnalyticsSummary, PollPerformance, ResolveReportInput, TrendPoint, UserActivity};
use voxpop_db::entities::{opinion::OpinionStatus, report::ReportStatus};

use super::{reports::ReportResponse, users::UserResponse};
use crate::{
    extractors::{AdminUser, ModeratorUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Report queue query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListReportsQuery {
    status: Option<ReportStatus>,
    #[serde(default = "super::default_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

/// The report queue, optionally filtered by status.
async fn list_reports(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let reports = state
        .moderation_service
        .list_reports(query.status, query.limit, query.offset)
        .await?;
    Ok(ApiResponse::ok(
        reports.into_iter().map(Into::into).collect(),
    ))
}

/// Resolve or dismiss a report.
async fn resolve_report(
    ModeratorUser(user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ResolveReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .resolve_report(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(report.into()))
}

/// User listing for the admin panel.
async fn list_users(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Query(page): Query<super::Pagination>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .moderation_service
        .list_users(page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        users.into_iter().map(Into::into).collect(),
    ))
}

/// Suspend a user (admins only).
async fn suspend_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.moderation_service.suspend_user(&admin.id, &id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Lift a user's suspension (admins only).
async fn unsuspend_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .moderation_service
        .unsuspend_user(&admin.id, &id)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Moderator flag request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetModeratorRequest {
    is_moderator: bool,
}

/// Grant or revoke moderator rights (admins only).
async fn set_moderator(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetModeratorRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .moderation_service
        .set_moderator(&id, req.is_moderator)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Opinion status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetOpinionStatusRequest {
    status: OpinionStatus,
}

/// Hide, remove, or restore an opinion.
async fn set_opinion_status(
    ModeratorUser(user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetOpinionStatusRequest>,
) -> AppResult<ApiResponse<super::opinions::OpinionResponse>> {
    let opinion = state
        .moderation_service
        .set_opinion_status(&user.id, &id, req.status)
        .await?;
    Ok(ApiResponse::ok(opinion.into()))
}

/// Remove a comment as a moderator.
async fn remove_comment(
    ModeratorUser(user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.moderation_service.remove_comment(&user.id, &id).await?;
    Ok(crate::response::ok())
}

/// Site-wide activity summary.
async fn analytics_summary(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AnalyticsSummary>> {
    let summary = state.analytics_service.summary().await?;
    Ok(ApiResponse::ok(summary))
}

/// Trend series query.
#[derive(Debug, Deserialize)]
struct TrendsQuery {
    #[serde(default = "default_trend_days")]
    days: i64,
}

const fn default_trend_days() -> i64 {
    30
}

/// Daily poll/vote/comment counts over the requested window.
async fn analytics_trends(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> AppResult<ApiResponse<Vec<TrendPoint>>> {
    let points = state.analytics_service.trends(query.days).await?;
    Ok(ApiResponse::ok(points))
}

/// Vote and comment figures for one poll.
async fn poll_performance(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PollPerformance>> {
    let performance = state.analytics_service.poll_performance(&id).await?;
    Ok(ApiResponse::ok(performance))
}

/// Activity figures for one user.
async fn user_activity(
    ModeratorUser(_user): ModeratorUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserActivity>> {
    let activity = state.analytics_service.user_activity(&id).await?;
    Ok(ApiResponse::ok(activity))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/{id}/resolve", post(resolve_report))
        .route("/users", get(list_users))
        .route("/users/{id}/suspend", post(suspend_user))
        .route("/users/{id}/unsuspend", post(unsuspend_user))
        .route("/users/{id}/moderator", put(set_moderator))
        .route("/opinions/{id}/status", put(set_opinion_status))
        .route("/comments/{id}/remove", post(remove_comment))
        .route("/analytics", get(analytics_summary))
        .route("/analytics/trends", get(analytics_trends))
        .route("/analytics/polls/{id}", get(poll_performance))
        .route("/analytics/users/{id}", get(user_activity))
}
