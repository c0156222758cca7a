//! Opinion service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voxpop_common::{AppError, AppResult, IdGenerator};
use voxpop_db::{
    entities::{
        ReactionKind, notification, notification::NotificationKind, opinion,
        opinion::OpinionStatus, opinion_reaction,
    },
    repositories::{
        NotificationRepository, OpinionReactionRepository, OpinionRepository, PollRepository,
        UserRepository,
    },
};

use super::reaction::next_reaction_state;

/// Opinion service for business logic.
#[derive(Clone)]
pub struct OpinionService {
    opinion_repo: OpinionRepository,
    reaction_repo: OpinionReactionRepository,
    poll_repo: PollRepository,
    user_repo: UserRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for posting an opinion.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpinionInput {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Body must be 1-5000 characters"))]
    pub body: String,

    /// Poll this opinion responds to, if any.
    pub poll_id: Option<String>,
}

/// Input for editing an opinion, guarded by `expected_version`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpinionInput {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Body must be 1-5000 characters"))]
    pub body: Option<String>,

    pub expected_version: i32,
}

/// An opinion together with the viewer's current reaction.
#[derive(Debug)]
pub struct OpinionView {
    pub opinion: opinion::Model,
    pub viewer_reaction: Option<ReactionKind>,
}

impl OpinionService {
    /// Create a new opinion service.
    #[must_use]
    pub const fn new(
        opinion_repo: OpinionRepository,
        reaction_repo: OpinionReactionRepository,
        poll_repo: PollRepository,
        user_repo: UserRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            opinion_repo,
            reaction_repo,
            poll_repo,
            user_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a new opinion.
    pub async fn create_opinion(
        &self,
        user_id: &str,
        input: CreateOpinionInput,
    ) -> AppResult<opinion::Model> {
        input.validate()?;

        if let Some(ref poll_id) = input.poll_id {
            // 404s when the referenced poll does not exist
            self.poll_repo.get_by_id(poll_id).await?;
        }

        let model = opinion::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            poll_id: Set(input.poll_id),
            title: Set(input.title),
            body: Set(input.body),
            status: Set(OpinionStatus::Active),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let opinion = self.opinion_repo.create(model).await?;

        self.user_repo.adjust_opinions_count(user_id, 1).await?;

        tracing::info!(opinion_id = %opinion.id, user_id = %user_id, "Posted opinion");
        Ok(opinion)
    }

    /// Get an opinion with the viewer's reaction. Hidden and removed
    /// opinions are only visible to moderators.
    pub async fn get_opinion(
        &self,
        opinion_id: &str,
        viewer_id: Option<&str>,
        can_moderate: bool,
    ) -> AppResult<OpinionView> {
        let opinion = self.opinion_repo.get_by_id(opinion_id).await?;

        if opinion.status != OpinionStatus::Active && !can_moderate {
            return Err(AppError::NotFound(format!(
                "Opinion not found: {opinion_id}"
            )));
        }

        let viewer_reaction = if let Some(uid) = viewer_id {
            self.reaction_repo
                .find_by_user_and_opinion(uid, opinion_id)
                .await?
                .map(|r| r.kind)
        } else {
            None
        };

        Ok(OpinionView {
            opinion,
            viewer_reaction,
        })
    }

    /// List active opinions, newest first.
    pub async fn list_opinions(&self, limit: u64, offset: u64) -> AppResult<Vec<opinion::Model>> {
        self.opinion_repo.list(limit.min(100), offset).await
    }

    /// Active opinions attached to a poll.
    pub async fn list_for_poll(&self, poll_id: &str) -> AppResult<Vec<opinion::Model>> {
        self.opinion_repo.find_by_poll(poll_id).await
    }

    /// Active opinions by one author.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<opinion::Model>> {
        self.opinion_repo
            .find_by_user(user_id, limit.min(100), offset)
            .await
    }

    /// Edit an opinion. Only the author may edit, and the stored version
    /// must match `expected_version`.
    pub async fn update_opinion(
        &self,
        user_id: &str,
        opinion_id: &str,
        input: UpdateOpinionInput,
    ) -> AppResult<opinion::Model> {
        input.validate()?;

        let opinion = self.opinion_repo.get_by_id(opinion_id).await?;
        if opinion.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can edit this opinion".to_string(),
            ));
        }
        if opinion.version != input.expected_version {
            return Err(AppError::Conflict(
                "Opinion was modified by another request; reload and retry".to_string(),
            ));
        }

        let next_version = opinion.version + 1;
        let mut active: opinion::ActiveModel = opinion.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
        }
        active.version = Set(next_version);
        active.updated_at = Set(Some(Utc::now().into()));

        self.opinion_repo.update(active).await
    }

    /// Delete an opinion. The author or a moderator may delete.
    pub async fn delete_opinion(
        &self,
        user_id: &str,
        can_moderate: bool,
        opinion_id: &str,
    ) -> AppResult<()> {
        let opinion = self.opinion_repo.get_by_id(opinion_id).await?;
        if opinion.user_id != user_id && !can_moderate {
            return Err(AppError::Forbidden(
                "Only the author or a moderator can delete this opinion".to_string(),
            ));
        }

        self.opinion_repo.delete(opinion_id).await?;
        self.user_repo
            .adjust_opinions_count(&opinion.user_id, -1)
            .await?;

        tracing::info!(opinion_id = %opinion_id, user_id = %user_id, "Deleted opinion");
        Ok(())
    }

    /// React to an opinion with the three-way toggle.
    pub async fn react(
        &self,
        user_id: &str,
        opinion_id: &str,
        requested: ReactionKind,
    ) -> AppResult<OpinionView> {
        let opinion = self.opinion_repo.get_by_id(opinion_id).await?;
        if opinion.status != OpinionStatus::Active {
            return Err(AppError::NotFound(format!(
                "Opinion not found: {opinion_id}"
            )));
        }

        let existing = self
            .reaction_repo
            .find_by_user_and_opinion(user_id, opinion_id)
            .await?;

        let transition = next_reaction_state(existing.as_ref().map(|r| r.kind), requested);

        match (existing, transition.next) {
            (None, Some(kind)) => {
                let model = opinion_reaction::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    opinion_id: Set(opinion_id.to_string()),
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
            self.opinion_repo
                .adjust_like_count(opinion_id, transition.like_delta)
                .await?;
        }
        if transition.dislike_delta != 0 {
            self.opinion_repo
                .adjust_dislike_count(opinion_id, transition.dislike_delta)
                .await?;
        }

        // Only a newly placed reaction notifies the author
        if transition.next.is_some() && opinion.user_id != user_id {
            let model = notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipient_id: Set(opinion.user_id.clone()),
                actor_id: Set(Some(user_id.to_string())),
                kind: Set(NotificationKind::Reaction),
                opinion_id: Set(Some(opinion_id.to_string())),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };
            self.notification_repo.create(model).await?;
        }

        self.get_opinion(opinion_id, Some(user_id), false).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_opinion_validation() {
        let valid = CreateOpinionInput {
            title: "A strong take".to_string(),
            body: "Because reasons.".to_string(),
            poll_id: None,
        };
        assert!(valid.validate().is_ok());

        let short_title = CreateOpinionInput {
            title: "Meh".to_string(),
            body: "Because reasons.".to_string(),
            poll_id: None,
        };
        assert!(short_title.validate().is_err());

        let empty_body = CreateOpinionInput {
            title: "A strong take".to_string(),
            body: String::new(),
            poll_id: None,
        };
        assert!(empty_body.validate().is_err());
    }
}
