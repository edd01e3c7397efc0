//! Commerce domain services for the EC site.
//!
//! This crate layers business rules on top of the `ec-store` data layer:
//!
//! - **Catalog**: products with draft/published/archived visibility
//! - **Cart**: one cart per user with quantity limits and price snapshots
//! - **Orders**: checkout from the cart and enforced status transitions
//! - **Events**: change notifications published on every cart mutation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ec_commerce::prelude::*;
//!
//! let events = CartEvents::default();
//! let catalog = Arc::new(CatalogService::with_demo_data(PageSettings::default()));
//! let carts = Arc::new(CartService::new(catalog.clone(), events.clone(), DEFAULT_MAX_QUANTITY_PER_ITEM));
//! let orders = OrderService::new(carts.clone(), PageSettings::default());
//!
//! let buyer = UserId::new("user-buyer");
//! carts.add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 2)?;
//! let order = orders.create_order(&buyer, CheckoutCustomer::new("buyer@example.com", "Demo Buyer"))?;
//! assert_eq!(order.status, OrderStatus::Pending);
//! ```

pub mod error;
pub mod events;
pub mod ids;
pub mod pagination;

pub mod cart;
pub mod catalog;
pub mod orders;

pub use error::CommerceError;
pub use events::{CartEvent, CartEvents};
pub use ids::*;
pub use pagination::{PageSettings, Pagination};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::events::{CartEvent, CartEvents};
    pub use crate::ids::*;
    pub use crate::pagination::{PageSettings, Pagination};

    // Catalog
    pub use crate::catalog::{
        demo_products, CatalogService, NewProduct, Product, ProductPage, ProductPatch,
        ProductQuery, ProductStatus, DEMO_PRODUCT_ID,
    };

    // Cart
    pub use crate::cart::{Cart, CartItem, CartService, DEFAULT_MAX_QUANTITY_PER_ITEM};

    // Orders
    pub use crate::orders::{
        CheckoutCustomer, Order, OrderItem, OrderPage, OrderQuery, OrderService, OrderStatus,
    };
}
