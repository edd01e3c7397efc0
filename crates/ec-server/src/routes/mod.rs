//! HTTP routes.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod testing;

use axum::http::{Method, Uri};
use axum::Router;

use crate::error::ApiError;
use crate::middleware::trace_requests;
use crate::state::AppState;

/// Build the full API router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(catalog::routes())
        .merge(cart::routes())
        .merge(orders::routes());

    if state.config.features.test_routes {
        tracing::warn!("test routes enabled");
        router = router.merge(testing::routes());
    }

    router
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(axum::middleware::from_fn(trace_requests))
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} {}", method, uri.path()))
}
