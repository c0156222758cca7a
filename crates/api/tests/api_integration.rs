//! API integration tests.
//!
//! These tests drive the full router against a mock database. They cover
//! routing, authentication gating, and request validation; query behavior
//! is covered by the repository and service tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;
use voxpop_api::{middleware::AppState, router as api_router};
use voxpop_core::{
    AnalyticsService, CommentService, ForumService, GroupService, ModerationService,
    NotificationService, OpinionService, PollService, SearchService, UserService,
};
use voxpop_db::repositories::{
    CommentReactionRepository, CommentRepository, ForumRepository, GroupMemberRepository,
    GroupRepository, NotificationRepository, OpinionReactionRepository, OpinionRepository,
    PollOptionRepository, PollRepository, ReportRepository, ThreadRepository,
    UserProfileRepository, UserRepository, VoteRepository,
};

/// Create a mock database connection.
fn create_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection()
}

/// Create test app state with a mock database.
fn create_test_state() -> AppState {
    let db = Arc::new(create_mock_db());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let option_repo = PollOptionRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let opinion_repo = OpinionRepository::new(Arc::clone(&db));
    let opinion_reaction_repo = OpinionReactionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let comment_reaction_repo = CommentReactionRepository::new(Arc::clone(&db));
    let forum_repo = ForumRepository::new(Arc::clone(&db));
    let thread_repo = ThreadRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let member_repo = GroupMemberRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone(), profile_repo);
    let poll_service = PollService::new(
        poll_repo.clone(),
        option_repo.clone(),
        vote_repo.clone(),
        user_repo.clone(),
        group_repo.clone(),
        member_repo.clone(),
        notification_repo.clone(),
    );
    let opinion_service = OpinionService::new(
        opinion_repo.clone(),
        opinion_reaction_repo,
        poll_repo.clone(),
        user_repo.clone(),
        notification_repo.clone(),
    );
    let comment_service = CommentService::new(
        comment_repo.clone(),
        comment_reaction_repo,
        poll_repo.clone(),
        opinion_repo.clone(),
        thread_repo.clone(),
        user_repo.clone(),
        notification_repo.clone(),
    );
    let forum_service = ForumService::new(forum_repo, thread_repo.clone());
    let group_service = GroupService::new(group_repo, member_repo, notification_repo.clone());
    let notification_service = NotificationService::new(notification_repo.clone());
    let moderation_service = ModerationService::new(
        report_repo.clone(),
        user_repo.clone(),
        poll_repo.clone(),
        opinion_repo.clone(),
        comment_repo.clone(),
        thread_repo,
        notification_repo,
    );
    let analytics_service = AnalyticsService::new(
        user_repo.clone(),
        poll_repo.clone(),
        option_repo,
        vote_repo,
        opinion_repo.clone(),
        comment_repo,
        report_repo,
    );
    let search_service = SearchService::new(poll_repo, opinion_repo, user_repo);

    AppState {
        user_service,
        poll_service,
        opinion_service,
        comment_service,
        forum_service,
        group_service,
        notification_service,
        moderation_service,
        analytics_service,
        search_service,
    }
}

/// Create the test router.
fn create_test_router() -> Router {
    let state = create_test_state();
    api_router().with_state(state)
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_error() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_register_without_accepting_terms_reports_field() {
    let app = create_test_router();

    // acceptTerms is omitted; validation must fail before any query runs
    let body = serde_json::json!({
        "email": "a@b.com",
        "password": "Abcdef1!",
        "confirmPassword": "Abcdef1!",
        "username": "abc",
        "fullName": "A B"
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert!(json["error"]["fields"]["accept_terms"].is_string());
}

#[tokio::test]
async fn test_me_without_token_returns_unauthorized() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_poll_without_token_returns_unauthorized() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/polls")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"title":"Favorite color?","options":[{"text":"Red"},{"text":"Blue"}]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_reports_without_token_returns_unauthorized() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/reports")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_without_query_returns_error() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Missing required q parameter fails query extraction
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}
