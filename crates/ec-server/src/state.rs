//! Shared application state.

use std::sync::Arc;

use ec_auth::{AuthError, SessionStore, UserDirectory};
use ec_commerce::prelude::*;

use crate::config::ServerConfig;

/// Services shared by every handler.
///
/// Each field is reference counted, so cloning is cheap and every clone
/// sees the same stores.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub catalog: Arc<CatalogService>,
    pub carts: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub events: CartEvents,
    pub users: Arc<UserDirectory>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Build fresh stores from the config.
    pub fn new(config: ServerConfig) -> Result<Self, AuthError> {
        let pages = config.page_settings();
        let seed = if config.features.seed_demo_data {
            demo_products()
        } else {
            Vec::new()
        };

        let events = CartEvents::default();
        let catalog = Arc::new(CatalogService::new(pages, seed));
        let carts = Arc::new(CartService::new(
            catalog.clone(),
            events.clone(),
            config.cart.max_quantity_per_item,
        ));
        let orders = Arc::new(OrderService::new(carts.clone(), pages));
        let users = Arc::new(UserDirectory::with_demo_accounts()?);
        let sessions = Arc::new(SessionStore::new(config.auth.session_ttl_secs));

        Ok(Self {
            config: Arc::new(config),
            catalog,
            carts,
            orders,
            events,
            users,
            sessions,
        })
    }

    /// Restore the catalog seed and drop every cart and order.
    ///
    /// Sessions survive so a logged-in test client stays logged in.
    pub fn reset(&self) {
        self.catalog.reset();
        self.carts.reset();
        self.orders.reset();
        tracing::info!("store reset to seed data");
    }
}
