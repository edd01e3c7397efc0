//! Routes for end-to-end test harnesses. Mounted only when enabled.

use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use crate::envelope::{self, Message};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/test/reset", post(reset))
}

async fn reset(State(state): State<AppState>) -> Response {
    state.reset();
    envelope::ok(Message::new("Store reset"))
}
