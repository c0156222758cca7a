//! Poll service.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
use voxpop_common::{AppError, AppResult, IdGenerator};
use voxpop_db::{
    entities::{notification, notification::NotificationKind, poll, poll_option, vote},
    repositories::{
        GroupMemberRepository, GroupRepository, NotificationRepository, PollListFilter,
        PollOptionRepository, PollRepository, UserRepository, VoteRepository,
    },
};

/// Poll service for business logic.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    option_repo: PollOptionRepository,
    vote_repo: VoteRepository,
    user_repo: UserRepository,
    group_repo: GroupRepository,
    member_repo: GroupMemberRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for one option of a new poll.
///
/// `Serialize` is required because the option-count validation on
/// [`CreatePollInput`] embeds the offending list in its error params.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionInput {
    #[validate(length(min = 1, max = 200, message = "Option text must be 1-200 characters"))]
    pub text: String,

    #[validate(url(message = "Invalid URL"))]
    pub image_url: Option<String>,
}

/// Input for creating a poll.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollInput {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub category: Option<String>,

    #[validate(length(max = 5, message = "At most 5 tags are allowed"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(
        length(min = 2, max = 10, message = "Poll must have 2-10 options"),
        nested
    )]
    pub options: Vec<PollOptionInput>,

    #[serde(default)]
    pub allow_multiple_votes: bool,

    #[serde(default = "default_true")]
    pub allow_comments: bool,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub show_results_before_voting: bool,

    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,

    pub group_id: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// Input for updating a poll. `expected_version` must match the stored
/// version or the update is rejected.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePollInput {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub category: Option<String>,

    #[validate(length(max = 5, message = "At most 5 tags are allowed"))]
    pub tags: Option<Vec<String>>,

    pub allow_comments: Option<bool>,

    pub show_results_before_voting: Option<bool>,

    pub expected_version: i32,
}

/// A poll with its options and the viewer's votes.
#[derive(Debug)]
pub struct PollView {
    pub poll: poll::Model,
    pub options: Vec<poll_option::Model>,
    /// Option IDs the viewer voted for (empty when unauthenticated).
    pub viewer_votes: Vec<String>,
    pub is_expired: bool,
}

/// Vote tally for one option.
#[derive(Debug)]
pub struct OptionResult {
    pub option: poll_option::Model,
    pub percentage: f64,
}

/// Aggregated poll results.
#[derive(Debug)]
pub struct PollResults {
    pub poll: poll::Model,
    pub total_votes: i32,
    pub options: Vec<OptionResult>,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        poll_repo: PollRepository,
        option_repo: PollOptionRepository,
        vote_repo: VoteRepository,
        user_repo: UserRepository,
        group_repo: GroupRepository,
        member_repo: GroupMemberRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            poll_repo,
            option_repo,
            vote_repo,
            user_repo,
            group_repo,
            member_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a poll with its options.
    pub async fn create_poll(&self, user_id: &str, input: CreatePollInput) -> AppResult<PollView> {
        input.validate()?;

        if let Some(ref group_id) = input.group_id {
            let group = self.group_repo.get_by_id(group_id).await?;
            let member = self.member_repo.find_member(&group.id, user_id).await?;
            if member.is_none() {
                return Err(AppError::Forbidden(
                    "You must be a group member to post polls there".to_string(),
                ));
            }
        }

        if let Some(expires_at) = input.expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::BadRequest(
                "Expiration must be in the future".to_string(),
            ));
        }

        let poll_id = self.id_gen.generate();
        let poll_model = poll::ActiveModel {
            id: Set(poll_id.clone()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            category: Set(input.category),
            tags: Set(json!(input.tags)),
            allow_multiple_votes: Set(input.allow_multiple_votes),
            allow_comments: Set(input.allow_comments),
            is_private: Set(input.is_private),
            show_results_before_voting: Set(input.show_results_before_voting),
            expires_at: Set(input.expires_at.map(Into::into)),
            group_id: Set(input.group_id.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let option_models: Vec<poll_option::ActiveModel> = input
            .options
            .into_iter()
            .enumerate()
            .map(|(position, opt)| poll_option::ActiveModel {
                id: Set(self.id_gen.generate()),
                poll_id: Set(poll_id.clone()),
                text: Set(opt.text),
                image_url: Set(opt.image_url),
                position: Set(position as i32),
                ..Default::default()
            })
            .collect();
        let poll = self
            .poll_repo
            .create_with_options(poll_model, option_models)
            .await?;

        self.user_repo.adjust_polls_count(user_id, 1).await?;
        if let Some(ref group_id) = input.group_id {
            self.group_repo.adjust_poll_count(group_id, 1).await?;
        }

        tracing::info!(poll_id = %poll.id, user_id = %user_id, "Created poll");

        let options = self.option_repo.find_by_poll(&poll.id).await?;
        Ok(PollView {
            poll,
            options,
            viewer_votes: vec![],
            is_expired: false,
        })
    }

    /// Get a poll with options and the viewer's votes.
    pub async fn get_poll(&self, poll_id: &str, viewer_id: Option<&str>) -> AppResult<PollView> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;

        if poll.is_private
            && let Some(ref group_id) = poll.group_id
        {
            let is_member = match viewer_id {
                Some(uid) => self.member_repo.find_member(group_id, uid).await?.is_some(),
                None => false,
            };
            if !is_member && viewer_id != Some(poll.user_id.as_str()) {
                return Err(AppError::Forbidden(
                    "This poll is private to its group".to_string(),
                ));
            }
        }

        let options = self.option_repo.find_by_poll(poll_id).await?;

        let viewer_votes = if let Some(uid) = viewer_id {
            self.vote_repo
                .find_by_user_and_poll(uid, poll_id)
                .await?
                .into_iter()
                .map(|v| v.option_id)
                .collect()
        } else {
            vec![]
        };

        let is_expired = poll
            .expires_at
            .as_ref()
            .is_some_and(|exp| *exp < Utc::now());

        Ok(PollView {
            poll,
            options,
            viewer_votes,
            is_expired,
        })
    }

    /// List polls with filters.
    pub async fn list_polls(
        &self,
        filter: &PollListFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<poll::Model>> {
        self.poll_repo.list(filter, limit.min(100), offset).await
    }

    /// Most-voted open public polls.
    pub async fn trending(&self, limit: u64) -> AppResult<Vec<poll::Model>> {
        self.poll_repo.trending(limit.min(50)).await
    }

    /// Update a poll. Only the creator may edit, and the stored version
    /// must match `expected_version`.
    pub async fn update_poll(
        &self,
        user_id: &str,
        poll_id: &str,
        input: UpdatePollInput,
    ) -> AppResult<poll::Model> {
        input.validate()?;

        let poll = self.poll_repo.get_by_id(poll_id).await?;
        if poll.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the creator can edit this poll".to_string(),
            ));
        }
        if poll.version != input.expected_version {
            return Err(AppError::Conflict(
                "Poll was modified by another request; reload and retry".to_string(),
            ));
        }

        let next_version = poll.version + 1;
        let mut active: poll::ActiveModel = poll.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = input.category {
            active.category = Set(Some(category));
        }
        if let Some(tags) = input.tags {
            active.tags = Set(json!(tags));
        }
        if let Some(allow_comments) = input.allow_comments {
            active.allow_comments = Set(allow_comments);
        }
        if let Some(show_results) = input.show_results_before_voting {
            active.show_results_before_voting = Set(show_results);
        }
        active.version = Set(next_version);
        active.updated_at = Set(Some(Utc::now().into()));

        self.poll_repo.update(active).await
    }

    /// Close a poll to further voting.
    pub async fn close_poll(
        &self,
        user_id: &str,
        can_moderate: bool,
        poll_id: &str,
    ) -> AppResult<poll::Model> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;
        if poll.user_id != user_id && !can_moderate {
            return Err(AppError::Forbidden(
                "Only the creator or a moderator can close this poll".to_string(),
            ));
        }
        if poll.is_closed {
            return Ok(poll);
        }

        let owner_id = poll.user_id.clone();
        let mut active: poll::ActiveModel = poll.into();
        active.is_closed = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));
        let poll = self.poll_repo.update(active).await?;

        if owner_id != user_id {
            self.notify(
                &owner_id,
                Some(user_id),
                NotificationKind::PollClosed,
                Some(poll_id),
            )
            .await?;
        }

        Ok(poll)
    }

    /// Delete a poll. The creator or a moderator may delete.
    pub async fn delete_poll(
        &self,
        user_id: &str,
        can_moderate: bool,
        poll_id: &str,
    ) -> AppResult<()> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;
        if poll.user_id != user_id && !can_moderate {
            return Err(AppError::Forbidden(
                "Only the creator or a moderator can delete this poll".to_string(),
            ));
        }

        self.poll_repo.delete(poll_id).await?;
        self.user_repo.adjust_polls_count(&poll.user_id, -1).await?;
        if let Some(ref group_id) = poll.group_id {
            self.group_repo.adjust_poll_count(group_id, -1).await?;
        }

        tracing::info!(poll_id = %poll_id, user_id = %user_id, "Deleted poll");
        Ok(())
    }

    /// Cast a vote for one or more options.
    pub async fn vote(
        &self,
        user_id: &str,
        poll_id: &str,
        option_ids: &[String],
    ) -> AppResult<PollView> {
        if option_ids.is_empty() {
            return Err(AppError::BadRequest(
                "At least one option must be selected".to_string(),
            ));
        }

        let poll = self.poll_repo.get_by_id(poll_id).await?;

        if poll.is_closed {
            return Err(AppError::BadRequest("Poll is closed".to_string()));
        }
        if let Some(ref expires_at) = poll.expires_at
            && *expires_at < Utc::now()
        {
            return Err(AppError::BadRequest("Poll has expired".to_string()));
        }
        if !poll.allow_multiple_votes && option_ids.len() > 1 {
            return Err(AppError::BadRequest(
                "This poll allows only one option per voter".to_string(),
            ));
        }

        let options = self.option_repo.find_by_poll(poll_id).await?;
        for option_id in option_ids {
            if !options.iter().any(|o| &o.id == option_id) {
                return Err(AppError::BadRequest(format!(
                    "Option does not belong to this poll: {option_id}"
                )));
            }
        }

        let models = option_ids
            .iter()
            .map(|option_id| vote::ActiveModel {
                id: Set(self.id_gen.generate()),
                poll_id: Set(poll_id.to_string()),
                option_id: Set(option_id.clone()),
                user_id: Set(user_id.to_string()),
                created_at: Set(Utc::now().into()),
            })
            .collect();
        let cast = self
            .vote_repo
            .cast(
                poll_id,
                user_id,
                option_ids,
                models,
                poll.allow_multiple_votes,
            )
            .await?;
        if !cast {
            return Err(AppError::Conflict(if poll.allow_multiple_votes {
                "You have already voted for this option".to_string()
            } else {
                "You have already voted on this poll".to_string()
            }));
        }

        for option_id in option_ids {
            self.option_repo.increment_vote_count(option_id).await?;
            self.poll_repo.increment_vote_count(poll_id).await?;
        }

        if poll.user_id != user_id {
            self.notify(
                &poll.user_id,
                Some(user_id),
                NotificationKind::PollVote,
                Some(poll_id),
            )
            .await?;
        }

        self.get_poll(poll_id, Some(user_id)).await
    }

    /// Aggregated results with per-option percentages.
    ///
    /// Before a viewer has voted, results are withheld unless the poll
    /// opts into early results or is already closed.
    pub async fn results(&self, poll_id: &str, viewer_id: Option<&str>) -> AppResult<PollResults> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;

        let is_expired = poll
            .expires_at
            .as_ref()
            .is_some_and(|exp| *exp < Utc::now());

        if !poll.show_results_before_voting && !poll.is_closed && !is_expired {
            let has_voted = match viewer_id {
                Some(uid) => self.vote_repo.has_voted(uid, poll_id).await?,
                None => false,
            };
            if !has_voted && viewer_id != Some(poll.user_id.as_str()) {
                return Err(AppError::Forbidden(
                    "Results are hidden until you vote".to_string(),
                ));
            }
        }

        let options = self.option_repo.find_by_poll(poll_id).await?;
        let total_votes = poll.vote_count;

        let options = options
            .into_iter()
            .map(|option| {
                let percentage = if total_votes > 0 {
                    f64::from(option.vote_count) / f64::from(total_votes) * 100.0
                } else {
                    0.0
                };
                OptionResult { option, percentage }
            })
            .collect();

        Ok(PollResults {
            poll,
            total_votes,
            options,
        })
    }

    async fn notify(
        &self,
        recipient_id: &str,
        actor_id: Option<&str>,
        kind: NotificationKind,
        poll_id: Option<&str>,
    ) -> AppResult<()> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipient_id: Set(recipient_id.to_string()),
            actor_id: Set(actor_id.map(ToString::to_string)),
            kind: Set(kind),
            poll_id: Set(poll_id.map(ToString::to_string)),
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
    use std::{collections::BTreeMap, sync::Arc};

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use super::*;

    const fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn option_inputs(n: usize) -> Vec<PollOptionInput> {
        (0..n)
            .map(|i| PollOptionInput {
                text: format!("Option {i}"),
                image_url: None,
            })
            .collect()
    }

    fn valid_input() -> CreatePollInput {
        CreatePollInput {
            title: "Favorite language?".to_string(),
            description: None,
            category: None,
            tags: vec![],
            options: option_inputs(2),
            allow_multiple_votes: false,
            allow_comments: true,
            is_private: false,
            show_results_before_voting: false,
            expires_at: None,
            group_id: None,
        }
    }

    #[test]
    fn test_create_poll_option_count_bounds() {
        let one = CreatePollInput {
            options: option_inputs(1),
            ..valid_input()
        };
        assert!(one.validate().is_err());

        let two = CreatePollInput {
            options: option_inputs(2),
            ..valid_input()
        };
        assert!(two.validate().is_ok());

        let ten = CreatePollInput {
            options: option_inputs(10),
            ..valid_input()
        };
        assert!(ten.validate().is_ok());

        let eleven = CreatePollInput {
            options: option_inputs(11),
            ..valid_input()
        };
        assert!(eleven.validate().is_err());
    }

    #[test]
    fn test_create_poll_title_boundary() {
        let four = CreatePollInput {
            title: "abcd".to_string(),
            ..valid_input()
        };
        assert!(four.validate().is_err());

        let five = CreatePollInput {
            title: "abcde".to_string(),
            ..valid_input()
        };
        assert!(five.validate().is_ok());
    }

    #[test]
    fn test_create_poll_tag_limit() {
        let six_tags = CreatePollInput {
            tags: (0..6).map(|i| format!("tag{i}")).collect(),
            ..valid_input()
        };
        assert!(six_tags.validate().is_err());

        let five_tags = CreatePollInput {
            tags: (0..5).map(|i| format!("tag{i}")).collect(),
            ..valid_input()
        };
        assert!(five_tags.validate().is_ok());
    }

    #[test]
    fn test_create_poll_rejects_empty_option_text() {
        let mut input = valid_input();
        input.options[1].text = String::new();
        assert!(input.validate().is_err());
    }

    fn poll_row(version: i32) -> poll::Model {
        poll::Model {
            id: "poll-1".to_string(),
            user_id: "user-1".to_string(),
            title: "Favorite language?".to_string(),
            description: None,
            category: None,
            tags: json!([]),
            allow_multiple_votes: false,
            allow_comments: true,
            is_private: false,
            show_results_before_voting: false,
            is_closed: false,
            is_featured: false,
            expires_at: None,
            group_id: None,
            vote_count: 0,
            comment_count: 0,
            version,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn option_row(id: &str, position: i32) -> poll_option::Model {
        poll_option::Model {
            id: id.to_string(),
            poll_id: "poll-1".to_string(),
            text: format!("Option {position}"),
            image_url: None,
            position,
            vote_count: 0,
        }
    }

    fn service_with(db: MockDatabase) -> PollService {
        let db = Arc::new(db.into_connection());
        PollService::new(
            PollRepository::new(db.clone()),
            PollOptionRepository::new(db.clone()),
            VoteRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            GroupRepository::new(db.clone()),
            GroupMemberRepository::new(db.clone()),
            NotificationRepository::new(db),
        )
    }

    fn update_input(expected_version: i32) -> UpdatePollInput {
        UpdatePollInput {
            title: Some("Renamed poll".to_string()),
            description: None,
            category: None,
            tags: None,
            allow_comments: None,
            show_results_before_voting: None,
            expected_version,
        }
    }

    #[tokio::test]
    async fn test_create_poll_persists_options_with_the_poll() {
        // Poll insert (returning), then the option batch, the creator's
        // poll counter, and the options re-read
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![poll_row(1)]])
            .append_query_results([vec![option_row("opt-a", 0), option_row("opt-b", 1)]])
            .append_exec_results([exec_ok(), exec_ok()]);
        let service = service_with(db);

        let view = service.create_poll("user-1", valid_input()).await.unwrap();
        assert_eq!(view.options.len(), 2);
        assert!(view.viewer_votes.is_empty());
    }

    #[tokio::test]
    async fn test_update_with_stale_version_is_rejected() {
        // Stored row is at version 3; the caller read version 2
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![poll_row(3)]]);
        let service = service_with(db);

        let err = service
            .update_poll("user-1", "poll-1", update_input(2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![poll_row(1)]]);
        let service = service_with(db);

        let err = service
            .update_poll("someone-else", "poll-1", update_input(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_get_poll_returns_options_in_position_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![poll_row(1)]])
            .append_query_results([vec![
                option_row("opt-a", 0),
                option_row("opt-b", 1),
                option_row("opt-c", 2),
            ]]);
        let service = service_with(db);

        let view = service.get_poll("poll-1", None).await.unwrap();
        assert_eq!(view.options.len(), 3);
        let positions: Vec<i32> = view.options.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(view.viewer_votes.is_empty());
        assert!(!view.is_expired);
    }

    #[tokio::test]
    async fn test_vote_on_closed_poll_is_rejected() {
        let closed = poll::Model {
            is_closed: true,
            ..poll_row(1)
        };
        let db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![closed]]);
        let service = service_with(db);

        let err = service
            .vote("user-2", "poll-1", &["opt-a".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_second_vote_on_single_choice_poll_conflicts() {
        // Poll lookup, option membership check, then inside the vote
        // transaction: the locked poll row and a duplicate count of 1
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![poll_row(1)]])
            .append_query_results([vec![option_row("opt-a", 0), option_row("opt-b", 1)]])
            .append_query_results([vec![poll_row(1)]])
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(1)),
            )])]]);
        let service = service_with(db);

        let err = service
            .vote("user-2", "poll-1", &["opt-a".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
