//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use voxpop_core::{
    AnalyticsService, CommentService, ForumService, GroupService, ModerationService,
    NotificationService, OpinionService, PollService, SearchService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub poll_service: PollService,
    pub opinion_service: OpinionService,
    pub comment_service: CommentService,
    pub forum_service: ForumService,
    pub group_service: GroupService,
    pub notification_service: NotificationService,
    pub moderation_service: ModerationService,
    pub analytics_service: AnalyticsService,
    pub search_service: SearchService,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        match state.user_service.authenticate(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token authentication failed");
            }
        }
    }

    next.run(req).await
}
