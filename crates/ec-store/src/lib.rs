//! In-memory data layer for the EC site.
//!
//! This crate provides the storage primitives the domain services build on:
//!
//! - **EntityStore**: identifier-keyed map of entities with seed/reset support
//! - **UserStore**: user-keyed map holding one payload per user
//! - **CrudRepository**: CRUD facade over an `EntityStore` with filtering,
//!   newest-first ordering and offset/limit pagination
//!
//! Nothing here is durable. Every store lives exactly as long as its owner,
//! and all stores are safe to share across threads.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ec_store::prelude::*;
//!
//! let store = Arc::new(EntityStore::with_seed(seed_products()));
//! let repo = CrudRepository::new(store, Product::from_input, Product::merged);
//!
//! let published = repo.find_all(
//!     &FindParams::new(20, 0).with_filter(Filter::new().with("status", "published")),
//! );
//! ```

mod entity;
mod error;
mod memory;
mod repository;
mod user_store;

pub use entity::{generate_id, Entity, EntityMeta, FieldValue, Filter};
pub use error::StoreError;
pub use memory::EntityStore;
pub use repository::{CreateFn, CrudRepository, FindParams, UpdateFn};
pub use user_store::UserStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Entity, EntityMeta, EntityStore, FieldValue, Filter, FindParams, CrudRepository,
        StoreError, UserStore,
    };
}
