//! Search service.

use serde::Serialize;
use voxpop_common::{AppError, AppResult};
use voxpop_db::{
    entities::{opinion, poll, user},
    repositories::{OpinionRepository, PollListFilter, PollRepository, UserRepository},
};

/// Search service over polls, opinions, and users.
#[derive(Clone)]
pub struct SearchService {
    poll_repo: PollRepository,
    opinion_repo: OpinionRepository,
    user_repo: UserRepository,
}

/// Combined search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub polls: Vec<poll::Model>,
    pub opinions: Vec<opinion::Model>,
    pub users: Vec<user::Model>,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(
        poll_repo: PollRepository,
        opinion_repo: OpinionRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            poll_repo,
            opinion_repo,
            user_repo,
        }
    }

    /// Search polls by title/description, opinions by title/body, and
    /// users by name.
    pub async fn search(&self, query: &str, limit: u64) -> AppResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::BadRequest(
                "Search query cannot be empty".to_string(),
            ));
        }
        if query.len() > 100 {
            return Err(AppError::BadRequest(
                "Search query is too long (max 100 chars)".to_string(),
            ));
        }

        let limit = limit.min(50);
        let filter = PollListFilter {
            search: Some(query.to_string()),
            is_closed: None,
            ..Default::default()
        };

        let polls = self.poll_repo.list(&filter, limit, 0).await?;
        let opinions = self.opinion_repo.search(query, limit, 0).await?;
        let users = self.user_repo.search(query, limit, 0).await?;

        Ok(SearchResults {
            polls,
            opinions,
            users,
        })
    }
}
