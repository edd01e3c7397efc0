//! Cart endpoints and the cart change stream.

use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use ec_commerce::prelude::*;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::envelope;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, CurrentSession};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_item))
        .route(
            "/api/cart/items/{product_id}",
            put(update_item).delete(remove_item),
        )
        .route("/api/cart/events", get(cart_events))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemRequest {
    product_id: ProductId,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
struct UpdateItemRequest {
    quantity: i64,
}

async fn get_cart(State(state): State<AppState>, session: CurrentSession) -> Response {
    envelope::ok(state.carts.get_cart(&session.user().id))
}

async fn add_item(
    State(state): State<AppState>,
    session: CurrentSession,
    ApiJson(req): ApiJson<AddItemRequest>,
) -> ApiResult {
    let cart = state
        .carts
        .add_to_cart(&session.user().id, &req.product_id, req.quantity)?;
    Ok(envelope::ok(cart))
}

async fn update_item(
    State(state): State<AppState>,
    session: CurrentSession,
    ApiPath(product_id): ApiPath<ProductId>,
    ApiJson(req): ApiJson<UpdateItemRequest>,
) -> ApiResult {
    let cart = state
        .carts
        .update_cart_item(&session.user().id, &product_id, req.quantity)?;
    Ok(envelope::ok(cart))
}

async fn remove_item(
    State(state): State<AppState>,
    session: CurrentSession,
    ApiPath(product_id): ApiPath<ProductId>,
) -> ApiResult {
    let cart = state
        .carts
        .remove_from_cart(&session.user().id, &product_id)?;
    Ok(envelope::ok(cart))
}

async fn clear_cart(State(state): State<AppState>, session: CurrentSession) -> Response {
    envelope::ok(state.carts.clear_cart(&session.user().id))
}

/// Server-sent `cart-updated` events for the caller's own cart.
async fn cart_events(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let user_id = session.user().id.clone();
    tracing::debug!(user_id = %user_id, "cart event stream opened");

    let stream = user_events(state.events.subscribe(), user_id)
        .map(|event| Event::default().event(event.name()).json_data(&event));
    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Events for `user_id` only, ending when the channel closes.
fn user_events(rx: Receiver<CartEvent>, user_id: UserId) -> impl Stream<Item = CartEvent> {
    futures::stream::unfold((rx, user_id), |(mut rx, user_id)| async move {
        loop {
            match rx.recv().await {
                Ok(event) if event.user_id() == &user_id => {
                    return Some((event, (rx, user_id)));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "cart event stream lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
