//! Order endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, put};
use axum::Router;
use ec_commerce::prelude::*;
use serde::Deserialize;

use crate::envelope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminSession, ApiJson, ApiPath, ApiQuery, CurrentSession};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", put(update_status))
}

/// Checkout body. Missing fields fall back to the session user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CheckoutRequest {
    customer_email: Option<String>,
    customer_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: OrderStatus,
}

/// Buyers are always scoped to their own orders.
async fn list_orders(
    State(state): State<AppState>,
    session: CurrentSession,
    ApiQuery(mut query): ApiQuery<OrderQuery>,
) -> ApiResult {
    let user = session.user();
    if !user.is_admin() {
        query.user_id = Some(user.id.clone());
    }
    Ok(envelope::ok(state.orders.get_orders(&query)))
}

/// Another buyer's order is reported as missing.
async fn get_order(
    State(state): State<AppState>,
    session: CurrentSession,
    ApiPath(id): ApiPath<String>,
) -> ApiResult {
    let user = session.user();
    let order = state.orders.get_order_by_id(&id)?;
    if !user.is_admin() && !order.is_owned_by(&user.id) {
        return Err(CommerceError::OrderNotFound(id).into());
    }
    Ok(envelope::ok(order))
}

async fn create_order(
    State(state): State<AppState>,
    session: CurrentSession,
    body: Bytes,
) -> ApiResult {
    let req: CheckoutRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CheckoutRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid checkout body: {e}")))?
    };

    let user = session.user();
    let customer = CheckoutCustomer::new(
        req.customer_email
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| user.email.clone()),
        req.customer_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| user.name.clone()),
    );

    let order = state.orders.create_order(&user.id, customer)?;
    Ok(envelope::created(order))
}

async fn update_status(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> ApiResult {
    Ok(envelope::ok(state.orders.update_order_status(&id, req.status)?))
}
