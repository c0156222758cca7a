//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde::Serialize;
use voxpop_common::AppResult;
use voxpop_core::{LoginInput, RegisterInput, Session};

use super::users::UserResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// An open session: the user plus the bearer token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
        }
    }
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.user_service.register(input).await?;
    Ok(ApiResponse::ok(session.into()))
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.user_service.login(input).await?;
    Ok(ApiResponse::ok(session.into()))
}

/// Log out by rotating the token, which invalidates the current one.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.regenerate_token(&user.id).await?;
    Ok(crate::response::ok())
}

/// The current session's user.
async fn session(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Issue a fresh token, invalidating the old one.
async fn regenerate_token(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.user_service.regenerate_token(&user.id).await?;
    Ok(ApiResponse::ok(session.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
        .route("/auth/token", post(regenerate_token))
}
