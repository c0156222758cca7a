//! Comment service.
//!
//! Comments attach to polls, opinions, or forum threads through one
//! polymorphic subject reference, so the threading, reaction, and
//! counter rules live in one place.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voxpop_common::{AppError, AppResult, IdGenerator};
use voxpop_db::{
    entities::{
        ReactionKind, comment, comment::SubjectType, comment_reaction, notification,
        notification::NotificationKind,
    },
    repositories::{
        CommentReactionRepository, CommentRepository, NotificationRepository, OpinionRepository,
        PollRepository, ThreadRepository, UserRepository,
    },
};

use super::reaction::next_reaction_state;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    reaction_repo: CommentReactionRepository,
    poll_repo: PollRepository,
    opinion_repo: OpinionRepository,
    thread_repo: ThreadRepository,
    user_repo: UserRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for posting a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub body: String,

    /// Comment being replied to, if any.
    pub parent_id: Option<String>,
}

/// Input for editing a comment, guarded by `expected_version`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub body: String,

    pub expected_version: i32,
}

/// A comment with the viewer's current reaction.
#[derive(Debug)]
pub struct CommentView {
    pub comment: comment::Model,
    pub viewer_reaction: Option<ReactionKind>,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        comment_repo: CommentRepository,
        reaction_repo: CommentReactionRepository,
        poll_repo: PollRepository,
        opinion_repo: OpinionRepository,
        thread_repo: ThreadRepository,
        user_repo: UserRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            comment_repo,
            reaction_repo,
            poll_repo,
            opinion_repo,
            thread_repo,
            user_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment on a poll, opinion, or thread.
    pub async fn create_comment(
        &self,
        user_id: &str,
        subject_type: SubjectType,
        subject_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        // The subject must exist and accept comments
        let subject_owner = match subject_type {
            SubjectType::Poll => {
                let poll = self.poll_repo.get_by_id(subject_id).await?;
                if !poll.allow_comments {
                    return Err(AppError::BadRequest(
                        "Comments are disabled on this poll".to_string(),
                    ));
                }
                poll.user_id
            }
            SubjectType::Opinion => self.opinion_repo.get_by_id(subject_id).await?.user_id,
            SubjectType::Thread => {
                let thread = self.thread_repo.get_by_id(subject_id).await?;
                if thread.is_locked {
                    return Err(AppError::BadRequest("Thread is locked".to_string()));
                }
                thread.user_id
            }
        };

        // Replies must target a comment on the same subject
        let parent = match input.parent_id {
            Some(ref parent_id) => {
                let parent = self.comment_repo.get_by_id(parent_id).await?;
                if parent.subject_type != subject_type || parent.subject_id != subject_id {
                    return Err(AppError::BadRequest(
                        "Parent comment belongs to a different subject".to_string(),
                    ));
                }
                if parent.is_removed {
                    return Err(AppError::BadRequest(
                        "Cannot reply to a removed comment".to_string(),
                    ));
                }
                Some(parent)
            }
            None => None,
        };

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            subject_type: Set(subject_type),
            subject_id: Set(subject_id.to_string()),
            parent_id: Set(input.parent_id.clone()),
            body: Set(input.body),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let created = self.comment_repo.create(model).await?;

        self.adjust_subject_comment_count(subject_type, subject_id, 1)
            .await?;
        self.user_repo.adjust_comments_count(user_id, 1).await?;

        if let Some(ref parent) = parent {
            self.comment_repo.adjust_reply_count(&parent.id, 1).await?;
        }

        // Reply notifies the parent author; a top-level comment notifies
        // the subject owner
        let (recipient, kind) = match parent {
            Some(parent) => (parent.user_id, NotificationKind::Reply),
            None => (subject_owner, NotificationKind::Comment),
        };
        if recipient != user_id {
            let model = notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipient_id: Set(recipient),
                actor_id: Set(Some(user_id.to_string())),
                kind: Set(kind),
                comment_id: Set(Some(created.id.clone())),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };
            self.notification_repo.create(model).await?;
        }

        Ok(created)
    }

    /// Top-level comments on a subject, oldest first.
    pub async fn list_comments(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        self.comment_repo
            .find_by_subject(subject_type, subject_id, limit.min(100), offset)
            .await
    }

    /// Replies to a comment, oldest first.
    pub async fn list_replies(&self, comment_id: &str) -> AppResult<Vec<comment::Model>> {
        // 404s when the parent does not exist
        self.comment_repo.get_by_id(comment_id).await?;
        self.comment_repo.find_replies(comment_id).await
    }

    /// Get a comment with the viewer's reaction.
    pub async fn get_comment(
        &self,
        comment_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<CommentView> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.is_removed {
            return Err(AppError::NotFound(format!(
                "Comment not found: {comment_id}"
            )));
        }

        let viewer_reaction = if let Some(uid) = viewer_id {
            self.reaction_repo
                .find_by_user_and_comment(uid, comment_id)
                .await?
                .map(|r| r.kind)
        } else {
            None
        };

        Ok(CommentView {
            comment,
            viewer_reaction,
        })
    }

    /// Edit a comment. Only the author may edit, and the stored version
    /// must match `expected_version`.
    pub async fn update_comment(
        &self,
        user_id: &str,
        comment_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can edit this comment".to_string(),
            ));
        }
        if comment.version != input.expected_version {
            return Err(AppError::Conflict(
                "Comment was modified by another request; reload and retry".to_string(),
            ));
        }

        let next_version = comment.version + 1;
        let mut active: comment::ActiveModel = comment.into();
        active.body = Set(input.body);
        active.version = Set(next_version);
        active.updated_at = Set(Some(Utc::now().into()));

        self.comment_repo.update(active).await
    }

    /// Delete a comment. The author or a moderator may delete. Only the
    /// targeted comment is removed; replies stay attached to the subject.
    pub async fn delete_comment(
        &self,
        user_id: &str,
        can_moderate: bool,
        comment_id: &str,
    ) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.is_removed {
            return Err(AppError::NotFound(format!(
                "Comment not found: {comment_id}"
            )));
        }
        if comment.user_id != user_id && !can_moderate {
            return Err(AppError::Forbidden(
                "Only the author or a moderator can delete this comment".to_string(),
            ));
        }

        // Replies survive: mark removed instead of deleting the row when
        // the comment has replies, so the thread structure stays intact
        if comment.reply_count > 0 {
            let mut active: comment::ActiveModel = comment.clone().into();
            active.is_removed = Set(true);
            active.updated_at = Set(Some(Utc::now().into()));
            self.comment_repo.update(active).await?;
        } else {
            self.comment_repo.delete(comment_id).await?;
            if let Some(ref parent_id) = comment.parent_id {
                self.comment_repo.adjust_reply_count(parent_id, -1).await?;
            }
        }

        self.adjust_subject_comment_count(comment.subject_type, &comment.subject_id, -1)
            .await?;
        self.user_repo
            .adjust_comments_count(&comment.user_id, -1)
            .await?;

        tracing::info!(comment_id = %comment_id, user_id = %user_id, "Deleted comment");
        Ok(())
    }

    /// Upvote or downvote a comment with the three-way toggle.
    pub async fn react(
        &self,
        user_id: &str,
        comment_id: &str,
        requested: ReactionKind,
    ) -> AppResult<CommentView> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.is_removed {
            return Err(AppError::NotFound(format!(
                "Comment not found: {comment_id}"
            )));
        }

        let existing = self
            .reaction_repo
            .find_by_user_and_comment(user_id, comment_id)
            .await?;

        let transition = next_reaction_state(existing.as_ref().map(|r| r.kind), requested);

        match (existing, transition.next) {
            (None, Some(kind)) => {
                let model = comment_reaction::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    comment_id: Set(comment_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    kind: Set(kind),
                    created_at: Set(Utc::now().into()),
                };
                self.reaction_repo.create(model).await?;
            }
            (Some(row), None) => {
                self.reaction_repo.delete(&row.id).await?;
            }
            (Some(row), Some(kind)) => {
                self.reaction_repo.update_kind(&row.id, kind).await?;
            }
            (None, None) => {}
        }

        if transition.like_delta != 0 {
            self.comment_repo
                .adjust_upvote_count(comment_id, transition.like_delta)
                .await?;
        }
        if transition.dislike_delta != 0 {
            self.comment_repo
                .adjust_downvote_count(comment_id, transition.dislike_delta)
                .await?;
        }

        self.get_comment(comment_id, Some(user_id)).await
    }

    async fn adjust_subject_comment_count(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        delta: i32,
    ) -> AppResult<()> {
        match subject_type {
            SubjectType::Poll => self.poll_repo.adjust_comment_count(subject_id, delta).await,
            SubjectType::Opinion => {
                self.opinion_repo
                    .adjust_comment_count(subject_id, delta)
                    .await
            }
            SubjectType::Thread => {
                self.thread_repo
                    .adjust_comment_count(subject_id, delta)
                    .await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    #[test]
    fn test_comment_body_validation() {
        let valid = CreateCommentInput {
            body: "Agreed.".to_string(),
            parent_id: None,
        };
        assert!(valid.validate().is_ok());

        let empty = CreateCommentInput {
            body: String::new(),
            parent_id: None,
        };
        assert!(empty.validate().is_err());

        let too_long = CreateCommentInput {
            body: "x".repeat(2001),
            parent_id: None,
        };
        assert!(too_long.validate().is_err());
    }

    fn comment_row() -> comment::Model {
        comment::Model {
            id: "comment-1".to_string(),
            user_id: "user-1".to_string(),
            subject_type: SubjectType::Poll,
            subject_id: "poll-1".to_string(),
            parent_id: None,
            body: "Agreed.".to_string(),
            upvote_count: 0,
            downvote_count: 0,
            reply_count: 0,
            is_removed: false,
            version: 1,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: MockDatabase) -> CommentService {
        let db = Arc::new(db.into_connection());
        CommentService::new(
            CommentRepository::new(db.clone()),
            CommentReactionRepository::new(db.clone()),
            PollRepository::new(db.clone()),
            OpinionRepository::new(db.clone()),
            ThreadRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            NotificationRepository::new(db),
        )
    }

    const fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_decrements_own_counters() {
        // One delete plus exactly two counter decrements: the poll's
        // comment_count and the author's comments_count
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![comment_row()]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()]);
        let service = service_with(db);

        service
            .delete_comment("user-1", false, "comment-1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_removed_comment_is_not_found() {
        let removed = comment::Model {
            is_removed: true,
            ..comment_row()
        };
        let db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![removed]]);
        let service = service_with(db);

        let err = service.get_comment("comment-1", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![comment_row()]]);
        let service = service_with(db);

        let err = service
            .delete_comment("someone-else", false, "comment-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_with_stale_version_is_rejected() {
        let stored = comment::Model {
            version: 2,
            ..comment_row()
        };
        let db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![stored]]);
        let service = service_with(db);

        let err = service
            .update_comment(
                "user-1",
                "comment-1",
                UpdateCommentInput {
                    body: "Edited.".to_string(),
                    expected_version: 1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
