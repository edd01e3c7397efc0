//! Liveness endpoint.

use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::envelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

async fn health() -> Response {
    envelope::ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
