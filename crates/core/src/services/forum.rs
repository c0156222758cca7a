//! Forum and thread service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voxpop_common::{AppError, AppResult, IdGenerator};
use voxpop_db::{
    entities::{forum, thread},
    repositories::{ForumRepository, ThreadRepository},
};

/// Forum service for business logic.
#[derive(Clone)]
pub struct ForumService {
    forum_repo: ForumRepository,
    thread_repo: ThreadRepository,
    id_gen: IdGenerator,
}

/// Input for creating a forum.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateForumInput {
    #[validate(length(min = 3, max = 100, message = "Name must be 3-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub category: Option<String>,

    #[serde(default = "default_true")]
    pub is_public: bool,
}

const fn default_true() -> bool {
    true
}

/// Input for starting a thread.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadInput {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: String,
}

/// Input for editing a thread, guarded by `expected_version`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThreadInput {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: Option<String>,

    pub expected_version: i32,
}

impl ForumService {
    /// Create a new forum service.
    #[must_use]
    pub const fn new(forum_repo: ForumRepository, thread_repo: ThreadRepository) -> Self {
        Self {
            forum_repo,
            thread_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a forum.
    pub async fn create_forum(
        &self,
        user_id: &str,
        input: CreateForumInput,
    ) -> AppResult<forum::Model> {
        input.validate()?;

        let model = forum::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            is_public: Set(input.is_public),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let forum = self.forum_repo.create(model).await?;

        tracing::info!(forum_id = %forum.id, user_id = %user_id, "Created forum");
        Ok(forum)
    }

    /// Get a forum by ID.
    pub async fn get_forum(&self, forum_id: &str) -> AppResult<forum::Model> {
        self.forum_repo.get_by_id(forum_id).await
    }

    /// List public forums, optionally by category.
    pub async fn list_forums(
        &self,
        category: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<forum::Model>> {
        self.forum_repo.list(category, limit.min(100), offset).await
    }

    /// Delete a forum. The creator or a moderator may delete.
    pub async fn delete_forum(
        &self,
        user_id: &str,
        can_moderate: bool,
        forum_id: &str,
    ) -> AppResult<()> {
        let forum = self.forum_repo.get_by_id(forum_id).await?;
        if forum.user_id != user_id && !can_moderate {
            return Err(AppError::Forbidden(
                "Only the creator or a moderator can delete this forum".to_string(),
            ));
        }
        self.forum_repo.delete(forum_id).await
    }

    /// Start a thread in a forum.
    pub async fn create_thread(
        &self,
        user_id: &str,
        forum_id: &str,
        input: CreateThreadInput,
    ) -> AppResult<thread::Model> {
        input.validate()?;

        // 404s when the forum does not exist
        self.forum_repo.get_by_id(forum_id).await?;

        let model = thread::ActiveModel {
            id: Set(self.id_gen.generate()),
            forum_id: Set(forum_id.to_string()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            body: Set(input.body),
            last_activity_at: Set(Utc::now().into()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let thread = self.thread_repo.create(model).await?;

        self.forum_repo.adjust_thread_count(forum_id, 1).await?;

        tracing::info!(thread_id = %thread.id, forum_id = %forum_id, "Created thread");
        Ok(thread)
    }

    /// Get a thread, counting the view.
    pub async fn get_thread(&self, thread_id: &str) -> AppResult<thread::Model> {
        let thread = self.thread_repo.get_by_id(thread_id).await?;
        self.thread_repo.increment_view_count(thread_id).await?;
        Ok(thread)
    }

    /// Threads in a forum, pinned first then latest activity.
    pub async fn list_threads(
        &self,
        forum_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<thread::Model>> {
        self.thread_repo
            .find_by_forum(forum_id, limit.min(100), offset)
            .await
    }

    /// Edit a thread. Only the author may edit, and the stored version
    /// must match `expected_version`.
    pub async fn update_thread(
        &self,
        user_id: &str,
        thread_id: &str,
        input: UpdateThreadInput,
    ) -> AppResult<thread::Model> {
        input.validate()?;

        let thread = self.thread_repo.get_by_id(thread_id).await?;
        if thread.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can edit this thread".to_string(),
            ));
        }
        if thread.version != input.expected_version {
            return Err(AppError::Conflict(
                "Thread was modified by another request; reload and retry".to_string(),
            ));
        }

        let next_version = thread.version + 1;
        let mut active: thread::ActiveModel = thread.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
        }
        active.version = Set(next_version);
        active.updated_at = Set(Some(Utc::now().into()));

        self.thread_repo.update(active).await
    }

    /// Delete a thread. The author or a moderator may delete.
    pub async fn delete_thread(
        &self,
        user_id: &str,
        can_moderate: bool,
        thread_id: &str,
    ) -> AppResult<()> {
        let thread = self.thread_repo.get_by_id(thread_id).await?;
        if thread.user_id != user_id && !can_moderate {
            return Err(AppError::Forbidden(
                "Only the author or a moderator can delete this thread".to_string(),
            ));
        }

        self.thread_repo.delete(thread_id).await?;
        self.forum_repo
            .adjust_thread_count(&thread.forum_id, -1)
            .await?;
        Ok(())
    }

    /// Pin or unpin a thread (moderators only).
    pub async fn set_pinned(&self, thread_id: &str, pinned: bool) -> AppResult<thread::Model> {
        let thread = self.thread_repo.get_by_id(thread_id).await?;
        let mut active: thread::ActiveModel = thread.into();
        active.is_pinned = Set(pinned);
        active.updated_at = Set(Some(Utc::now().into()));
        self.thread_repo.update(active).await
    }

    /// Lock or unlock a thread (moderators only).
    pub async fn set_locked(&self, thread_id: &str, locked: bool) -> AppResult<thread::Model> {
        let thread = self.thread_repo.get_by_id(thread_id).await?;
        let mut active: thread::ActiveModel = thread.into();
        active.is_locked = Set(locked);
        active.updated_at = Set(Some(Utc::now().into()));
        self.thread_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forum_name_validation() {
        let short = CreateForumInput {
            name: "ab".to_string(),
            description: None,
            category: None,
            is_public: true,
        };
        assert!(short.validate().is_err());

        let ok = CreateForumInput {
            name: "Rust users".to_string(),
            description: None,
            category: None,
            is_public: true,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_thread_title_boundary() {
        let four = CreateThreadInput {
            title: "abcd".to_string(),
            body: "hello".to_string(),
        };
        assert!(four.validate().is_err());

        let five = CreateThreadInput {
            title: "abcde".to_string(),
            body: "hello".to_string(),
        };
        assert!(five.validate().is_ok());
    }
}
