//! Cart service.

use super::cart::Cart;
use crate::catalog::CatalogService;
use crate::error::CommerceError;
use crate::events::{CartEvent, CartEvents};
use crate::ids::{ProductId, UserId};
use ec_store::UserStore;
use std::sync::Arc;

/// Per-user carts with catalog-checked mutations.
///
/// Each mutation runs under the cart store's lock and commits only if it
/// succeeds; a successful mutation publishes [`CartEvent::Updated`].
pub struct CartService {
    carts: UserStore<Cart>,
    catalog: Arc<CatalogService>,
    events: CartEvents,
    max_quantity: i64,
}

impl CartService {
    pub fn new(catalog: Arc<CatalogService>, events: CartEvents, max_quantity: i64) -> Self {
        Self {
            carts: UserStore::new(),
            catalog,
            events,
            max_quantity,
        }
    }

    /// The user's cart, empty if they have none.
    pub fn get_cart(&self, user_id: &UserId) -> Cart {
        self.carts.get_or_default(user_id.as_str())
    }

    /// Add a published product to the user's cart.
    pub fn add_to_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        let product = self.catalog.get_product_by_id(product_id.as_str())?;
        if !product.is_available() {
            return Err(CommerceError::ProductUnavailable(product_id.to_string()));
        }

        let max_quantity = self.max_quantity;
        let cart = self.carts.try_update(user_id.as_str(), |cart| {
            cart.add_item(&product, quantity, max_quantity)?;
            Ok::<_, CommerceError>(cart.clone())
        })?;

        tracing::debug!(user_id = %user_id, product_id = %product_id, quantity, "added to cart");
        self.notify(user_id, &cart);
        Ok(cart)
    }

    /// Set the quantity of a cart line; 0 removes it.
    pub fn update_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        let max_quantity = self.max_quantity;
        let cart = self.carts.try_update(user_id.as_str(), |cart| {
            cart.update_quantity(product_id, quantity, max_quantity)?;
            Ok::<_, CommerceError>(cart.clone())
        })?;

        self.notify(user_id, &cart);
        Ok(cart)
    }

    /// Remove a line from the cart.
    pub fn remove_from_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Cart, CommerceError> {
        let cart = self.carts.try_update(user_id.as_str(), |cart| {
            cart.remove_item(product_id)?;
            Ok::<_, CommerceError>(cart.clone())
        })?;

        self.notify(user_id, &cart);
        Ok(cart)
    }

    /// Empty the user's cart.
    ///
    /// A user with no stored cart is left without one and no event is sent.
    pub fn clear_cart(&self, user_id: &UserId) -> Cart {
        let cleared = self.carts.modify(user_id.as_str(), |cart| {
            cart.clear();
            cart.clone()
        });

        match cleared {
            Some(cart) => {
                self.notify(user_id, &cart);
                cart
            }
            None => Cart::default(),
        }
    }

    /// Remove the user's cart and return its contents.
    ///
    /// Taking is a single store operation, so a cart can be taken at most
    /// once and no line added before the take is lost.
    pub fn take_cart(&self, user_id: &UserId) -> Cart {
        let cart = self.carts.take(user_id.as_str()).unwrap_or_default();
        if !cart.is_empty() {
            self.notify(user_id, &Cart::default());
        }
        cart
    }

    /// Drop every cart.
    pub fn reset(&self) {
        self.carts.clear();
    }

    /// Maximum quantity allowed per line.
    pub fn max_quantity(&self) -> i64 {
        self.max_quantity
    }

    pub fn events(&self) -> &CartEvents {
        &self.events
    }

    fn notify(&self, user_id: &UserId, cart: &Cart) {
        self.events.publish(CartEvent::Updated {
            user_id: user_id.clone(),
            item_count: cart.item_count,
        });
    }
}
