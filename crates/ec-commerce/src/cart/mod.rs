//! Shopping cart module.
//!
//! Contains the per-user cart with its line items and the cart service.

mod cart;
mod service;

pub use cart::{Cart, CartItem, DEFAULT_MAX_QUANTITY_PER_ITEM};
pub use service::CartService;
