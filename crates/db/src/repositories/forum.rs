//! Forum and thread repositories.

use std::sync::Arc;

use crate::entities::{Forum, Thread, forum, thread};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use voxpop_common::{AppError, AppResult};

/// Forum repository for database operations.
#[derive(Clone)]
pub struct ForumRepository {
    db: Arc<DatabaseConnection>,
}

impl ForumRepository {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a forum by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<forum::Model>> {
        Forum::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a forum by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<forum::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Forum not found: {id}")))
    }

    /// Create a new forum.
    pub async fn create(&self, model: forum::ActiveModel) -> AppResult<forum::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a forum.
    pub async fn update(&self, model: forum::ActiveModel) -> AppResult<forum::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a forum (threads cascade).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Forum::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List public forums, optionally filtered by category (paginated).
    pub async fn list(
        &self,
        category: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<forum::Model>> {
        let mut condition = Condition::all().add(forum::Column::IsPublic.eq(true));
        if let Some(category) = category {
            condition = condition.add(forum::Column::Category.eq(category));
        }

        Forum::find()
            .filter(condition)
            .order_by_desc(forum::Column::ThreadCount)
            .order_by_desc(forum::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Adjust thread count atomically by the given delta.
    pub async fn adjust_thread_count(&self, forum_id: &str, delta: i32) -> AppResult<()> {
        Forum::update_many()
            .col_expr(
                forum::Column::ThreadCount,
                Expr::col(forum::Column::ThreadCount).add(delta),
            )
            .filter(forum::Column::Id.eq(forum_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Thread repository for database operations.
#[derive(Clone)]
pub struct ThreadRepository {
    db: Arc<DatabaseConnection>,
}

impl ThreadRepository {
    /// Create a new thread repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a thread by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<thread::Model>> {
        Thread::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a thread by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<thread::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Thread not found: {id}")))
    }

    /// Create a new thread.
    pub async fn create(&self, model: thread::ActiveModel) -> AppResult<thread::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a thread.
    pub async fn update(&self, model: thread::ActiveModel) -> AppResult<thread::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a thread.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Thread::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Threads in a forum, pinned first then latest activity (paginated).
    pub async fn find_by_forum(
        &self,
        forum_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<thread::Model>> {
        Thread::find()
            .filter(thread::Column::ForumId.eq(forum_id))
            .order_by_desc(thread::Column::IsPinned)
            .order_by_desc(thread::Column::LastActivityAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment view count atomically.
    pub async fn increment_view_count(&self, thread_id: &str) -> AppResult<()> {
        Thread::update_many()
            .col_expr(
                thread::Column::ViewCount,
                Expr::col(thread::Column::ViewCount).add(1),
            )
            .filter(thread::Column::Id.eq(thread_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Adjust comment count and bump last activity atomically.
    pub async fn adjust_comment_count(&self, thread_id: &str, delta: i32) -> AppResult<()> {
        Thread::update_many()
            .col_expr(
                thread::Column::CommentCount,
                Expr::col(thread::Column::CommentCount).add(delta),
            )
            .col_expr(
                thread::Column::LastActivityAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(thread::Column::Id.eq(thread_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all threads.
    pub async fn count(&self) -> AppResult<u64> {
        Thread::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
