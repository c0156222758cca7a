//! Moderation service: content reports and admin actions.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voxpop_common::{AppError, AppResult, IdGenerator};
use voxpop_db::{
    entities::{
        notification, notification::NotificationKind, opinion, opinion::OpinionStatus, report,
        report::{ReportStatus, ReportSubjectType},
        user,
    },
    repositories::{
        CommentRepository, NotificationRepository, OpinionRepository, PollRepository,
        ReportRepository, ThreadRepository, UserRepository,
    },
};

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
    poll_repo: PollRepository,
    opinion_repo: OpinionRepository,
    comment_repo: CommentRepository,
    thread_repo: ThreadRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for reporting content.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    pub subject_type: ReportSubjectType,

    pub subject_id: String,

    #[validate(length(min = 10, max = 1000, message = "Reason must be 10-1000 characters"))]
    pub reason: String,
}

/// Input for resolving or dismissing a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportInput {
    /// `resolved` or `dismissed`.
    pub status: ReportStatus,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub resolution_note: Option<String>,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        report_repo: ReportRepository,
        user_repo: UserRepository,
        poll_repo: PollRepository,
        opinion_repo: OpinionRepository,
        comment_repo: CommentRepository,
        thread_repo: ThreadRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            report_repo,
            user_repo,
            poll_repo,
            opinion_repo,
            comment_repo,
            thread_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a report against a piece of content or a user.
    pub async fn create_report(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        // The reported subject must exist, and nobody gets to report
        // themselves or their own content
        let subject_owner = match input.subject_type {
            ReportSubjectType::Poll => self.poll_repo.get_by_id(&input.subject_id).await?.user_id,
            ReportSubjectType::Opinion => {
                self.opinion_repo.get_by_id(&input.subject_id).await?.user_id
            }
            ReportSubjectType::Comment => {
                self.comment_repo.get_by_id(&input.subject_id).await?.user_id
            }
            ReportSubjectType::Thread => {
                self.thread_repo.get_by_id(&input.subject_id).await?.user_id
            }
            ReportSubjectType::User => self.user_repo.get_by_id(&input.subject_id).await?.id,
        };
        if subject_owner == reporter_id {
            return Err(AppError::BadRequest(
                "You cannot report yourself or your own content".to_string(),
            ));
        }

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            subject_type: Set(input.subject_type),
            subject_id: Set(input.subject_id),
            reason: Set(input.reason),
            status: Set(ReportStatus::Pending),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let report = self.report_repo.create(model).await?;

        tracing::info!(report_id = %report.id, reporter_id = %reporter_id, "Filed report");
        Ok(report)
    }

    /// List reports, optionally by status.
    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.list(status, limit.min(100), offset).await
    }

    /// Count reports awaiting review.
    pub async fn pending_report_count(&self) -> AppResult<u64> {
        self.report_repo.count_pending()
            .await
    }

    /// Resolve or dismiss a report.
    pub async fn resolve_report(
        &self,
        resolver_id: &str,
        report_id: &str,
        input: ResolveReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        if input.status == ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "A report cannot be resolved back to pending".to_string(),
            ));
        }

        let report = self.report_repo.get_by_id(report_id).await?;
        if report.status != ReportStatus::Pending {
            return Err(AppError::Conflict(
                "Report has already been handled".to_string(),
            ));
        }

        let mut active: report::ActiveModel = report.into();
        active.status = Set(input.status);
        active.resolver_id = Set(Some(resolver_id.to_string()));
        active.resolution_note = Set(input.resolution_note);
        active.resolved_at = Set(Some(Utc::now().into()));

        self.report_repo.update(active).await
    }

    /// Hide or restore an opinion.
    pub async fn set_opinion_status(
        &self,
        moderator_id: &str,
        opinion_id: &str,
        status: OpinionStatus,
    ) -> AppResult<opinion::Model> {
        let opinion = self.opinion_repo.get_by_id(opinion_id).await?;
        let author_id = opinion.user_id.clone();

        let mut active: opinion::ActiveModel = opinion.into();
        active.status = Set(status.clone());
        active.updated_at = Set(Some(Utc::now().into()));
        let opinion = self.opinion_repo.update(active).await?;

        if status != OpinionStatus::Active {
            self.notify_moderated(&author_id, moderator_id, Some(opinion_id), None)
                .await?;
        }

        tracing::info!(
            opinion_id = %opinion_id,
            moderator_id = %moderator_id,
            "Changed opinion status"
        );
        Ok(opinion)
    }

    /// Remove a comment without deleting the row, keeping thread shape.
    pub async fn remove_comment(&self, moderator_id: &str, comment_id: &str) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.is_removed {
            return Ok(());
        }
        let author_id = comment.user_id.clone();

        let mut active: voxpop_db::entities::comment::ActiveModel = comment.into();
        active.is_removed = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));
        self.comment_repo.update(active).await?;

        self.notify_moderated(&author_id, moderator_id, None, Some(comment_id))
            .await?;
        Ok(())
    }

    /// Suspend a user. Suspended accounts cannot authenticate.
    pub async fn suspend_user(&self, admin_id: &str, user_id: &str) -> AppResult<user::Model> {
        if admin_id == user_id {
            return Err(AppError::BadRequest(
                "You cannot suspend yourself".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        if user.is_admin {
            return Err(AppError::Forbidden(
                "Admin accounts cannot be suspended".to_string(),
            ));
        }

        let mut active: user::ActiveModel = user.into();
        active.is_suspended = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        tracing::warn!(user_id = %user_id, admin_id = %admin_id, "Suspended user");
        Ok(user)
    }

    /// Lift a suspension.
    pub async fn unsuspend_user(&self, admin_id: &str, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.is_suspended = Set(false);
        active.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user_id, admin_id = %admin_id, "Unsuspended user");
        Ok(user)
    }

    /// Grant or revoke the moderator flag (admins only).
    pub async fn set_moderator(&self, user_id: &str, is_moderator: bool) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.is_moderator = Set(is_moderator);
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await
    }

    /// List users for the admin panel.
    pub async fn list_users(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(limit.min(100), offset).await
    }

    async fn notify_moderated(
        &self,
        recipient_id: &str,
        moderator_id: &str,
        opinion_id: Option<&str>,
        comment_id: Option<&str>,
    ) -> AppResult<()> {
        if recipient_id == moderator_id {
            return Ok(());
        }
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipient_id: Set(recipient_id.to_string()),
            actor_id: Set(None),
            kind: Set(NotificationKind::Moderation),
            opinion_id: Set(opinion_id.map(ToString::to_string)),
            comment_id: Set(comment_id.map(ToString::to_string)),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        self.notification_repo.create(model).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn user_row(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "casey".to_string(),
            username_lower: "casey".to_string(),
            email: "casey@example.com".to_string(),
            token: None,
            display_name: None,
            avatar_url: None,
            cover_image_url: None,
            polls_count: 0,
            opinions_count: 0,
            comments_count: 0,
            is_suspended: false,
            is_admin: false,
            is_moderator: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: MockDatabase) -> ModerationService {
        let db = Arc::new(db.into_connection());
        ModerationService::new(
            ReportRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            PollRepository::new(db.clone()),
            OpinionRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            ThreadRepository::new(db.clone()),
            NotificationRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_cannot_report_yourself() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row("u1")]]);
        let service = service_with(db);

        let err = service
            .create_report(
                "u1",
                CreateReportInput {
                    subject_type: ReportSubjectType::User,
                    subject_id: "u1".to_string(),
                    reason: "Reporting my own account to test things".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_report_reason_validation() {
        let short = CreateReportInput {
            subject_type: ReportSubjectType::Poll,
            subject_id: "p1".to_string(),
            reason: "spam".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = CreateReportInput {
            subject_type: ReportSubjectType::Poll,
            subject_id: "p1".to_string(),
            reason: "This poll is spam advertising".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
