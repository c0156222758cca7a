//! Content report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use voxpop_common::AppResult;
use voxpop_core::CreateReportInput;
use voxpop_db::entities::report;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Report representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub subject_type: report::ReportSubjectType,
    pub subject_id: String,
    pub reason: String,
    pub status: report::ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

impl From<report::Model> for ReportResponse {
    fn from(report: report::Model) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id,
            subject_type: report.subject_type,
            subject_id: report.subject_id,
            reason: report.reason,
            status: report.status,
            resolver_id: report.resolver_id,
            resolution_note: report.resolution_note,
            created_at: report.created_at.to_rfc3339(),
            resolved_at: report.resolved_at.map(|r| r.to_rfc3339()),
        }
    }
}

/// File a report against a piece of content or a user.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.moderation_service.create_report(&user.id, input).await?;
    Ok(ApiResponse::ok(report.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_report))
}
