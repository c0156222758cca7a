//! Voxpop server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxpop_api::{AppState, auth_middleware, router as api_router};
use voxpop_common::Config;
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

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxpop=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting voxpop server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = voxpop_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    voxpop_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
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

    // Initialize services
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
    let group_service = GroupService::new(
        group_repo,
        member_repo,
        notification_repo.clone(),
    );
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

    // Create app state
    let state = AppState {
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
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
