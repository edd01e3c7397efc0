//! Orders module.
//!
//! Contains the order entity, its status lifecycle and the order service.

mod order;
mod service;

pub use order::{CheckoutCustomer, NewOrder, Order, OrderItem, OrderStatus};
pub use service::{OrderPage, OrderQuery, OrderService};
