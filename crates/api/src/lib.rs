//! HTTP API layer for voxpop.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: polls, opinions, comments, forums, groups,
//!   notifications, moderation, search
//! - **Extractors**: authentication and role checks
//! - **Middleware**: token authentication, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
