//! Analytics service: platform-wide and per-subject aggregates.

use chrono::{Duration, Utc};
use serde::Serialize;
use voxpop_common::AppResult;
use voxpop_db::repositories::{
    CommentRepository, OpinionRepository, PollOptionRepository, PollRepository, ReportRepository,
    UserRepository, VoteRepository,
};

/// Analytics service for admin dashboards.
#[derive(Clone)]
pub struct AnalyticsService {
    user_repo: UserRepository,
    poll_repo: PollRepository,
    option_repo: PollOptionRepository,
    vote_repo: VoteRepository,
    opinion_repo: OpinionRepository,
    comment_repo: CommentRepository,
    report_repo: ReportRepository,
}

/// Platform-wide totals with 7-day deltas.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_users: u64,
    pub total_polls: u64,
    pub open_polls: u64,
    pub total_votes: u64,
    pub total_opinions: u64,
    pub total_comments: u64,
    pub new_users_last_week: u64,
    pub new_polls_last_week: u64,
    pub votes_last_week: u64,
    pub new_opinions_last_week: u64,
    pub new_comments_last_week: u64,
    pub pending_reports: u64,
}

/// One day of activity in a trend series.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Bucket date, `YYYY-MM-DD` (UTC).
    pub date: String,
    pub polls: u64,
    pub votes: u64,
    pub comments: u64,
}

/// Vote share of one option within a poll's results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPerformance {
    pub option_id: String,
    pub text: String,
    pub vote_count: i32,
    pub percentage: f64,
}

/// Engagement numbers for one poll.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollPerformance {
    pub poll_id: String,
    pub total_votes: i32,
    pub unique_voters: u64,
    pub comment_count: i32,
    pub options: Vec<OptionPerformance>,
    /// Unique voters as a share of all registered users, 0.0..=1.0.
    pub engagement_rate: f64,
}

/// Contribution counts for one user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub user_id: String,
    pub polls_created: i32,
    pub opinions_posted: i32,
    pub comments_posted: i32,
    pub votes_cast: u64,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        user_repo: UserRepository,
        poll_repo: PollRepository,
        option_repo: PollOptionRepository,
        vote_repo: VoteRepository,
        opinion_repo: OpinionRepository,
        comment_repo: CommentRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            user_repo,
            poll_repo,
            option_repo,
            vote_repo,
            opinion_repo,
            comment_repo,
            report_repo,
        }
    }

    /// Platform-wide summary for the admin dashboard.
    pub async fn summary(&self) -> AppResult<AnalyticsSummary> {
        let week_ago = Utc::now() - Duration::days(7);

        Ok(AnalyticsSummary {
            total_users: self.user_repo.count().await?,
            total_polls: self.poll_repo.count().await?,
            open_polls: self.poll_repo.count_open().await?,
            total_votes: self.vote_repo.count().await?,
            total_opinions: self.opinion_repo.count().await?,
            total_comments: self.comment_repo.count().await?,
            new_users_last_week: self.user_repo.count_created_since(week_ago).await?,
            new_polls_last_week: self.poll_repo.count_created_since(week_ago).await?,
            votes_last_week: self.vote_repo.count_created_since(week_ago).await?,
            new_opinions_last_week: self.opinion_repo.count_created_since(week_ago).await?,
            new_comments_last_week: self.comment_repo.count_created_since(week_ago).await?,
            pending_reports: self.report_repo.count_pending().await?,
        })
    }

    /// Daily activity buckets over the last `days` days, oldest first.
    ///
    /// `days` is clamped to 1..=90 so a bad query parameter cannot turn
    /// into hundreds of count queries.
    pub async fn trends(&self, days: i64) -> AppResult<Vec<TrendPoint>> {
        let days = days.clamp(1, 90);
        let today = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();

        let mut points = Vec::with_capacity(days as usize);
        for offset in (0..days).rev() {
            let start = today - Duration::days(offset);
            let end = start + Duration::days(1);

            points.push(TrendPoint {
                date: start.format("%Y-%m-%d").to_string(),
                polls: self.poll_repo.count_created_between(start, end).await?,
                votes: self.vote_repo.count_created_between(start, end).await?,
                comments: self.comment_repo.count_created_between(start, end).await?,
            });
        }

        Ok(points)
    }

    /// Engagement numbers for one poll, with the per-option vote split.
    pub async fn poll_performance(&self, poll_id: &str) -> AppResult<PollPerformance> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;
        let options = self.option_repo.find_by_poll(poll_id).await?;
        let unique_voters = self.vote_repo.count_voters(poll_id).await?;
        let total_users = self.user_repo.count().await?;

        let total_votes = poll.vote_count;
        let options = options
            .into_iter()
            .map(|option| {
                let percentage = if total_votes > 0 {
                    f64::from(option.vote_count) / f64::from(total_votes) * 100.0
                } else {
                    0.0
                };
                OptionPerformance {
                    option_id: option.id,
                    text: option.text,
                    vote_count: option.vote_count,
                    percentage,
                }
            })
            .collect();

        let engagement_rate = if total_users > 0 {
            unique_voters as f64 / total_users as f64
        } else {
            0.0
        };

        Ok(PollPerformance {
            poll_id: poll.id,
            total_votes,
            unique_voters,
            comment_count: poll.comment_count,
            options,
            engagement_rate,
        })
    }

    /// Contribution counts for one user.
    pub async fn user_activity(&self, user_id: &str) -> AppResult<UserActivity> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let votes_cast = self.vote_repo.count_by_user(user_id).await?;

        Ok(UserActivity {
            user_id: user.id,
            polls_created: user.polls_count,
            opinions_posted: user.opinions_count,
            comments_posted: user.comments_count,
            votes_cast,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use serde_json::json;
    use voxpop_db::entities::{poll, poll_option, vote};

    use super::*;

    fn service_with(db: MockDatabase) -> AnalyticsService {
        let db = Arc::new(db.into_connection());
        AnalyticsService::new(
            UserRepository::new(db.clone()),
            PollRepository::new(db.clone()),
            PollOptionRepository::new(db.clone()),
            VoteRepository::new(db.clone()),
            OpinionRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            ReportRepository::new(db),
        )
    }

    fn poll_row() -> poll::Model {
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
            vote_count: 4,
            comment_count: 2,
            version: 1,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn option_row(id: &str, vote_count: i32, position: i32) -> poll_option::Model {
        poll_option::Model {
            id: id.to_string(),
            poll_id: "poll-1".to_string(),
            text: format!("Option {position}"),
            image_url: None,
            position,
            vote_count,
        }
    }

    fn vote_row(id: &str, user_id: &str) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            poll_id: "poll-1".to_string(),
            option_id: "opt-a".to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        [("num_items", Value::BigInt(Some(n)))].into_iter().collect()
    }

    #[tokio::test]
    async fn test_poll_performance_breaks_down_options_and_engagement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![poll_row()]])
            .append_query_results([vec![option_row("opt-a", 3, 0), option_row("opt-b", 1, 1)]])
            .append_query_results([vec![
                vote_row("v1", "user-1"),
                vote_row("v2", "user-1"),
                vote_row("v3", "user-2"),
                vote_row("v4", "user-3"),
            ]])
            .append_query_results([vec![count_row(10)]]);
        let service = service_with(db);

        let performance = service.poll_performance("poll-1").await.unwrap();
        assert_eq!(performance.total_votes, 4);
        assert_eq!(performance.unique_voters, 3);
        assert_eq!(performance.options.len(), 2);
        assert!((performance.options[0].percentage - 75.0).abs() < f64::EPSILON);
        assert!((performance.options[1].percentage - 25.0).abs() < f64::EPSILON);
        assert!((performance.engagement_rate - 0.3).abs() < 1e-9);
    }
}
