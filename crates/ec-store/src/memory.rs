//! Identifier-keyed in-memory entity store.

use crate::entity::Entity;
use indexmap::IndexMap;
use parking_lot::RwLock;

/// In-memory map from entity id to entity.
///
/// Entities are returned in insertion order. Each operation takes the lock
/// once, so individual calls are atomic; sequences of calls are not.
///
/// # Example
///
/// ```rust,ignore
/// let store = EntityStore::with_seed(demo_products());
/// store.set(product.clone());
/// assert_eq!(store.get_by_id(product.id()), Some(product));
/// store.reset(); // back to demo_products()
/// ```
pub struct EntityStore<T> {
    items: RwLock<IndexMap<String, T>>,
    seed: Vec<T>,
}

impl<T: Entity> EntityStore<T> {
    /// Create an empty store with no seed.
    pub fn new() -> Self {
        Self::with_seed(Vec::new())
    }

    /// Create a store pre-populated with `seed`.
    ///
    /// The same records are restored by [`EntityStore::reset`].
    pub fn with_seed(seed: Vec<T>) -> Self {
        let items = index(&seed);
        Self {
            items: RwLock::new(items),
            seed,
        }
    }

    /// Get all entities in insertion order.
    pub fn get_all(&self) -> Vec<T> {
        self.items.read().values().cloned().collect()
    }

    /// Get an entity by id.
    pub fn get_by_id(&self, id: &str) -> Option<T> {
        self.items.read().get(id).cloned()
    }

    /// Check if an entity exists.
    pub fn contains(&self, id: &str) -> bool {
        self.items.read().contains_key(id)
    }

    /// Insert or replace an entity by its id.
    pub fn set(&self, entity: T) {
        let id = entity.id().to_string();
        self.items.write().insert(id, entity);
    }

    /// Insert an entity, regenerating its id until it is unused.
    pub(crate) fn insert_unique(&self, mut entity: T) -> T {
        let mut items = self.items.write();
        while items.contains_key(entity.id()) {
            entity.meta_mut().reassign_id();
        }
        items.insert(entity.id().to_string(), entity.clone());
        entity
    }

    /// Delete an entity, returning whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        self.items.write().shift_remove(id).is_some()
    }

    /// Replace an existing entity with `f(existing)` under a single lock.
    ///
    /// Returns the stored replacement, or `None` if `id` is absent.
    pub fn modify<F>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&T) -> T,
    {
        let mut items = self.items.write();
        let slot = items.get_mut(id)?;
        let next = f(slot);
        *slot = next.clone();
        Some(next)
    }

    /// Like [`EntityStore::modify`], but `f` may reject the change.
    ///
    /// The check and the write happen under one write lock. On `Err` the
    /// stored entity is left untouched. Returns `None` if `id` is absent.
    pub fn try_modify<F, E>(&self, id: &str, f: F) -> Option<Result<T, E>>
    where
        F: FnOnce(&T) -> Result<T, E>,
    {
        let mut items = self.items.write();
        let slot = items.get_mut(id)?;
        Some(f(slot).map(|next| {
            *slot = next.clone();
            next
        }))
    }

    /// Get all entities satisfying `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.items
            .read()
            .values()
            .filter(|entity| predicate(entity))
            .cloned()
            .collect()
    }

    /// Remove every entity. The seed is kept for a later reset.
    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Restore exactly the seed set, discarding all mutations.
    pub fn reset(&self) {
        *self.items.write() = index(&self.seed);
    }

    /// Number of stored entities.
    pub fn count(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn index<T: Entity>(entities: &[T]) -> IndexMap<String, T> {
    entities
        .iter()
        .map(|entity| (entity.id().to_string(), entity.clone()))
        .collect()
}
