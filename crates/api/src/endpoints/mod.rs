//! API endpoints.

mod admin;
mod auth;
mod comments;
mod forums;
mod groups;
mod notifications;
mod opinions;
mod polls;
mod reports;
mod search;
mod threads;
mod users;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Common limit/offset pagination query.
#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/polls", polls::router())
        .nest("/opinions", opinions::router())
        .nest("/comments", comments::router())
        .nest("/forums", forums::router())
        .nest("/threads", threads::router())
        .nest("/groups", groups::router())
        .nest("/notifications", notifications::router())
        .nest("/reports", reports::router())
        .nest("/search", search::router())
        .nest("/admin", admin::router())
}
