//! Product catalog module.
//!
//! Contains the product entity, its create/patch inputs, the demo seed and
//! the catalog service.

mod product;
mod seed;
mod service;

pub use product::{NewProduct, Product, ProductPatch, ProductStatus};
pub use seed::{demo_products, DEMO_PRODUCT_ID};
pub use service::{CatalogService, ProductPage, ProductQuery};
