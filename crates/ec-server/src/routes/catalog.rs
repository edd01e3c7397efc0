//! Catalog endpoints.

use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use ec_commerce::prelude::*;
use serde::Serialize;

use crate::envelope;
use crate::error::ApiResult;
use crate::extract::{AdminSession, ApiJson, ApiPath, ApiQuery, OptionalSession};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog/products", get(list_products).post(create_product))
        .route(
            "/api/catalog/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// Admins may list any status; everyone else only sees published products.
async fn list_products(
    State(state): State<AppState>,
    session: OptionalSession,
    ApiQuery(mut query): ApiQuery<ProductQuery>,
) -> ApiResult {
    if !session.is_admin() {
        query.status = Some(ProductStatus::Published);
    }
    Ok(envelope::ok(state.catalog.get_products(&query)))
}

async fn get_product(
    State(state): State<AppState>,
    session: OptionalSession,
    ApiPath(id): ApiPath<String>,
) -> ApiResult {
    let product = state.catalog.get_product_by_id(&id)?;
    if !product.is_available() && !session.is_admin() {
        return Err(CommerceError::ProductNotFound(id).into());
    }
    Ok(envelope::ok(product))
}

async fn create_product(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult {
    let product = state.catalog.create_product(input)?;
    tracing::info!(product_id = %product.meta.id(), admin = %session.user.id, "product created");
    Ok(envelope::created(product))
}

async fn update_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult {
    Ok(envelope::ok(state.catalog.update_product(&id, patch)?))
}

async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiPath(id): ApiPath<String>,
) -> Response {
    envelope::ok(Deleted {
        deleted: state.catalog.delete_product(&id),
    })
}
