//! Opinion and opinion reaction repositories.

use std::sync::Arc;

use crate::entities::{
    Opinion, OpinionReaction, ReactionKind, opinion, opinion::OpinionStatus, opinion_reaction,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use voxpop_common::{AppError, AppResult};

/// Opinion repository for database operations.
#[derive(Clone)]
pub struct OpinionRepository {
    db: Arc<DatabaseConnection>,
}

impl OpinionRepository {
    /// Create a new opinion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an opinion by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<opinion::Model>> {
        Opinion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an opinion by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<opinion::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Opinion not found: {id}")))
    }

    /// Create a new opinion.
    pub async fn create(&self, model: opinion::ActiveModel) -> AppResult<opinion::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an opinion.
    pub async fn update(&self, model: opinion::ActiveModel) -> AppResult<opinion::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an opinion.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Opinion::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List active opinions, newest first (paginated).
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<opinion::Model>> {
        Opinion::find()
            .filter(opinion::Column::Status.eq(OpinionStatus::Active))
            .order_by_desc(opinion::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active opinions attached to a poll.
    pub async fn find_by_poll(&self, poll_id: &str) -> AppResult<Vec<opinion::Model>> {
        Opinion::find()
            .filter(opinion::Column::PollId.eq(poll_id))
            .filter(opinion::Column::Status.eq(OpinionStatus::Active))
            .order_by_desc(opinion::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List opinions by one author, newest first (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<opinion::Model>> {
        Opinion::find()
            .filter(opinion::Column::UserId.eq(user_id))
            .filter(opinion::Column::Status.eq(OpinionStatus::Active))
            .order_by_desc(opinion::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search active opinions by title or body substring.
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<opinion::Model>> {
        let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));

        Opinion::find()
            .filter(opinion::Column::Status.eq(OpinionStatus::Active))
            .filter(
                Condition::any()
                    .add(opinion::Column::Title.like(&pattern))
                    .add(opinion::Column::Body.like(&pattern)),
            )
            .order_by_desc(opinion::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Adjust like count atomically by the given delta.
    pub async fn adjust_like_count(&self, opinion_id: &str, delta: i32) -> AppResult<()> {
        Opinion::update_many()
            .col_expr(
                opinion::Column::LikeCount,
                Expr::col(opinion::Column::LikeCount).add(delta),
            )
            .filter(opinion::Column::Id.eq(opinion_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Adjust dislike count atomically by the given delta.
    pub async fn adjust_dislike_count(&self, opinion_id: &str, delta: i32) -> AppResult<()> {
        Opinion::update_many()
            .col_expr(
                opinion::Column::DislikeCount,
                Expr::col(opinion::Column::DislikeCount).add(delta),
            )
            .filter(opinion::Column::Id.eq(opinion_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Adjust comment count atomically by the given delta.
    pub async fn adjust_comment_count(&self, opinion_id: &str, delta: i32) -> AppResult<()> {
        Opinion::update_many()
            .col_expr(
                opinion::Column::CommentCount,
                Expr::col(opinion::Column::CommentCount).add(delta),
            )
            .filter(opinion::Column::Id.eq(opinion_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all opinions.
    pub async fn count(&self) -> AppResult<u64> {
        Opinion::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count opinions created at or after the given instant.
    pub async fn count_created_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        Opinion::find()
            .filter(opinion::Column::CreatedAt.gte(since))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Opinion reaction repository for database operations.
#[derive(Clone)]
pub struct OpinionReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl OpinionReactionRepository {
    /// Create a new opinion reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's reaction to an opinion.
    pub async fn find_by_user_and_opinion(
        &self,
        user_id: &str,
        opinion_id: &str,
    ) -> AppResult<Option<opinion_reaction::Model>> {
        OpinionReaction::find()
            .filter(opinion_reaction::Column::UserId.eq(user_id))
            .filter(opinion_reaction::Column::OpinionId.eq(opinion_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reaction.
    pub async fn create(
        &self,
        model: opinion_reaction::ActiveModel,
    ) -> AppResult<opinion_reaction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Change the kind of an existing reaction.
    pub async fn update_kind(&self, id: &str, kind: ReactionKind) -> AppResult<()> {
        OpinionReaction::update_many()
            .col_expr(opinion_reaction::Column::Kind, Expr::value(kind))
            .filter(opinion_reaction::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a reaction.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        OpinionReaction::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
