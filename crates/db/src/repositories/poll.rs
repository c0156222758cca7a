//! Poll, poll option, and vote repositories.

use std::sync::Arc;

use crate::entities::{Poll, PollOption, Vote, poll, poll_option, vote};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use voxpop_common::{AppError, AppResult};

/// Sort order for poll listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollSort {
    /// Newest first (default).
    #[default]
    Newest,
    /// Most votes first.
    Popular,
    /// Open polls with the closest expiry first.
    EndingSoon,
}

/// Filters for poll listings.
#[derive(Debug, Clone, Default)]
pub struct PollListFilter {
    /// Only polls by this creator.
    pub user_id: Option<String>,
    /// Only polls in this category.
    pub category: Option<String>,
    /// Only polls in this group.
    pub group_id: Option<String>,
    /// Only open (true) or closed (false) polls.
    pub is_closed: Option<bool>,
    /// Only featured polls.
    pub is_featured: Option<bool>,
    /// Title/description substring search.
    pub search: Option<String>,
    /// Sort order.
    pub sort: PollSort,
}

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a poll by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<poll::Model>> {
        Poll::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a poll by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<poll::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PollNotFound(id.to_string()))
    }

    /// Create a new poll.
    pub async fn create(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a poll and its options in one transaction, so a failed
    /// option insert never leaves an option-less poll behind.
    pub async fn create_with_options(
        &self,
        poll: poll::ActiveModel,
        options: Vec<poll_option::ActiveModel>,
    ) -> AppResult<poll::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = poll
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !options.is_empty() {
            PollOption::insert_many(options)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(created)
    }

    /// Update a poll.
    pub async fn update(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a poll (options and votes cascade).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Poll::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List polls with filters (paginated).
    pub async fn list(
        &self,
        filter: &PollListFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<poll::Model>> {
        let mut condition = Condition::all();

        if let Some(ref user_id) = filter.user_id {
            condition = condition.add(poll::Column::UserId.eq(user_id));
        }
        if let Some(ref category) = filter.category {
            condition = condition.add(poll::Column::Category.eq(category));
        }
        if let Some(ref group_id) = filter.group_id {
            condition = condition.add(poll::Column::GroupId.eq(group_id));
        }
        if let Some(is_closed) = filter.is_closed {
            condition = condition.add(poll::Column::IsClosed.eq(is_closed));
        }
        if let Some(is_featured) = filter.is_featured {
            condition = condition.add(poll::Column::IsFeatured.eq(is_featured));
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.replace('%', "\\%").replace('_', "\\_"));
            condition = condition.add(
                Condition::any()
                    .add(poll::Column::Title.like(&pattern))
                    .add(poll::Column::Description.like(&pattern)),
            );
        }

        let mut query = Poll::find().filter(condition);

        query = match filter.sort {
            PollSort::Newest => query.order_by_desc(poll::Column::CreatedAt),
            PollSort::Popular => query
                .order_by_desc(poll::Column::VoteCount)
                .order_by_desc(poll::Column::CreatedAt),
            PollSort::EndingSoon => query
                .filter(poll::Column::IsClosed.eq(false))
                .filter(poll::Column::ExpiresAt.is_not_null())
                .order_by_asc(poll::Column::ExpiresAt),
        };

        query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Polls with the most votes over the public, open set.
    pub async fn trending(&self, limit: u64) -> AppResult<Vec<poll::Model>> {
        Poll::find()
            .filter(poll::Column::IsPrivate.eq(false))
            .filter(poll::Column::IsClosed.eq(false))
            .order_by_desc(poll::Column::VoteCount)
            .order_by_desc(poll::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment vote count atomically (single UPDATE query, no fetch).
    pub async fn increment_vote_count(&self, poll_id: &str) -> AppResult<()> {
        Poll::update_many()
            .col_expr(
                poll::Column::VoteCount,
                Expr::col(poll::Column::VoteCount).add(1),
            )
            .filter(poll::Column::Id.eq(poll_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Adjust comment count atomically by the given delta.
    pub async fn adjust_comment_count(&self, poll_id: &str, delta: i32) -> AppResult<()> {
        Poll::update_many()
            .col_expr(
                poll::Column::CommentCount,
                Expr::col(poll::Column::CommentCount).add(delta),
            )
            .filter(poll::Column::Id.eq(poll_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all polls.
    pub async fn count(&self) -> AppResult<u64> {
        Poll::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count open polls.
    pub async fn count_open(&self) -> AppResult<u64> {
        Poll::find()
            .filter(poll::Column::IsClosed.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count polls created at or after the given instant.
    pub async fn count_created_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        Poll::find()
            .filter(poll::Column::CreatedAt.gte(since))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count polls created within `[start, end)`.
    pub async fn count_created_between(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        Poll::find()
            .filter(poll::Column::CreatedAt.gte(start))
            .filter(poll::Column::CreatedAt.lt(end))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Poll option repository for database operations.
#[derive(Clone)]
pub struct PollOptionRepository {
    db: Arc<DatabaseConnection>,
}

impl PollOptionRepository {
    /// Create a new poll option repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get options for a poll in display order.
    pub async fn find_by_poll(&self, poll_id: &str) -> AppResult<Vec<poll_option::Model>> {
        PollOption::find()
            .filter(poll_option::Column::PollId.eq(poll_id))
            .order_by_asc(poll_option::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment vote count for an option atomically.
    pub async fn increment_vote_count(&self, option_id: &str) -> AppResult<()> {
        PollOption::update_many()
            .col_expr(
                poll_option::Column::VoteCount,
                Expr::col(poll_option::Column::VoteCount).add(1),
            )
            .filter(poll_option::Column::Id.eq(option_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's votes on a poll.
    pub async fn find_by_user_and_poll(
        &self,
        user_id: &str,
        poll_id: &str,
    ) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PollId.eq(poll_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has voted on a poll.
    pub async fn has_voted(&self, user_id: &str, poll_id: &str) -> AppResult<bool> {
        let count = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PollId.eq(poll_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Insert a user's votes on a poll, atomically with the duplicate check.
    ///
    /// Locks the poll row so two requests from the same user cannot both
    /// pass the check. Returns `false` when the user already voted: on the
    /// whole poll for single-choice polls, on any of the given options
    /// otherwise.
    pub async fn cast(
        &self,
        poll_id: &str,
        user_id: &str,
        option_ids: &[String],
        models: Vec<vote::ActiveModel>,
        allow_multiple: bool,
    ) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Poll::find_by_id(poll_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut existing = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PollId.eq(poll_id));
        if allow_multiple {
            existing = existing.filter(vote::Column::OptionId.is_in(option_ids));
        }
        let count = existing
            .count(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if count > 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(false);
        }

        Vote::insert_many(models)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }

    /// Count unique voters on a poll.
    pub async fn count_voters(&self, poll_id: &str) -> AppResult<u64> {
        let votes = Vote::find()
            .filter(vote::Column::PollId.eq(poll_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut unique_users = std::collections::HashSet::new();
        for v in votes {
            unique_users.insert(v.user_id);
        }
        Ok(unique_users.len() as u64)
    }

    /// Count all votes.
    pub async fn count(&self) -> AppResult<u64> {
        Vote::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes cast at or after the given instant.
    pub async fn count_created_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::CreatedAt.gte(since))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes cast within `[start, end)`.
    pub async fn count_created_between(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::CreatedAt.gte(start))
            .filter(vote::Column::CreatedAt.lt(end))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes by one user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
