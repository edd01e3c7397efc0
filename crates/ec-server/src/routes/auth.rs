//! Login, logout and session lookup.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::envelope::{self, Message};
use crate::error::{ApiError, ApiResult};
use crate::extract::{
    append_cookie, clear_session_cookie, session_cookie, set_session_cookie, ApiJson,
    OptionalSession,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(current_session))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult {
    // Hash verification is CPU bound.
    let users = state.users.clone();
    let email = req.email.clone();
    let user = tokio::task::spawn_blocking(move || users.authenticate(&email, &req.password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .inspect_err(|_| tracing::info!(email = %req.email, "login rejected"))?;

    let session = state.sessions.create(user);
    let cookie = set_session_cookie(session.id.as_str(), state.sessions.ttl().num_seconds())?;

    let mut response = envelope::ok(session.user);
    append_cookie(response.headers_mut(), cookie);
    Ok(response)
}

/// Always succeeds, with or without a live session.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_cookie(&headers) {
        state.sessions.delete(id);
    }

    let mut response = envelope::ok(Message::new("Logged out"));
    append_cookie(response.headers_mut(), clear_session_cookie());
    response
}

/// The logged-in user, or `null`.
async fn current_session(session: OptionalSession) -> Response {
    envelope::ok(session.0.map(|s| s.user))
}
