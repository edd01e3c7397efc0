//! Generic CRUD repository over an [`EntityStore`].

use crate::entity::{Entity, Filter};
use crate::error::StoreError;
use crate::memory::EntityStore;
use std::sync::Arc;

/// Builds a new entity (fresh id and timestamps) from create input.
pub type CreateFn<T, C> = Box<dyn Fn(C) -> T + Send + Sync>;

/// Merges update input into an existing entity.
pub type UpdateFn<T, U> = Box<dyn Fn(&T, U) -> T + Send + Sync>;

/// Query parameters for [`CrudRepository::find_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindParams {
    /// Optional field-equality filter.
    pub filter: Option<Filter>,
    /// Maximum number of results.
    pub limit: usize,
    /// Number of results to skip.
    pub offset: usize,
}

impl FindParams {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            filter: None,
            limit,
            offset,
        }
    }

    /// Every entity, no filter.
    pub fn all() -> Self {
        Self::new(usize::MAX, 0)
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl Default for FindParams {
    fn default() -> Self {
        Self::all()
    }
}

/// CRUD facade over an entity store.
///
/// `C` is the create input and `U` the update input. The caller supplies the
/// functions turning them into entities; the repository guarantees that an
/// update never changes the identifier or creation time and always advances
/// the update time.
///
/// # Example
///
/// ```rust,ignore
/// let repo = CrudRepository::new(
///     Arc::new(EntityStore::new()),
///     |input: NewProduct| Product::from_input(input),
///     |existing: &Product, patch: ProductPatch| existing.merged(patch),
/// );
///
/// let widget = repo.create(NewProduct { name: "Widget".into(), price: 1000, ..Default::default() });
/// let published = repo.update(widget.id(), ProductPatch::status(ProductStatus::Published))?;
/// ```
pub struct CrudRepository<T, C, U> {
    store: Arc<EntityStore<T>>,
    create_entity: CreateFn<T, C>,
    update_entity: UpdateFn<T, U>,
}

impl<T, C, U> CrudRepository<T, C, U>
where
    T: Entity,
{
    pub fn new<CF, UF>(store: Arc<EntityStore<T>>, create_entity: CF, update_entity: UF) -> Self
    where
        CF: Fn(C) -> T + Send + Sync + 'static,
        UF: Fn(&T, U) -> T + Send + Sync + 'static,
    {
        Self {
            store,
            create_entity: Box::new(create_entity),
            update_entity: Box::new(update_entity),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<EntityStore<T>> {
        &self.store
    }

    /// Find entities matching the filter, newest first, then paginate.
    ///
    /// Entities created at the same instant keep their store order. An empty
    /// result means nothing matched the page; use [`CrudRepository::count`]
    /// to tell an empty filter result from an out-of-range offset.
    pub fn find_all(&self, params: &FindParams) -> Vec<T> {
        let mut items = match &params.filter {
            Some(filter) => self.store.filter(|entity| filter.matches(entity)),
            None => self.store.get_all(),
        };

        items.sort_by(|a, b| b.meta().created_at().cmp(&a.meta().created_at()));

        items
            .into_iter()
            .skip(params.offset)
            .take(params.limit)
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<T> {
        self.store.get_by_id(id)
    }

    /// Construct and store a new entity.
    pub fn create(&self, input: C) -> T {
        let entity = (self.create_entity)(input);
        let stored = self.store.insert_unique(entity);
        tracing::debug!(id = %stored.id(), "entity created");
        stored
    }

    /// Merge `input` into the entity with `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if the id is absent; never creates.
    pub fn update(&self, id: &str, input: U) -> Result<T, StoreError> {
        let update_entity = &self.update_entity;
        let updated = self
            .store
            .modify(id, |existing| {
                let mut next = update_entity(existing, input);
                next.meta_mut().rebase(existing.meta());
                next
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        tracing::debug!(id = %id, "entity updated");
        Ok(updated)
    }

    /// Merge `input` into the entity with `id` if `guard` accepts the current
    /// state.
    ///
    /// The guard and the write run under the store's write lock, so no other
    /// update can land in between. The outer error is
    /// [`StoreError::NotFound`]; the inner one is the guard's rejection.
    pub fn try_update<E, G>(&self, id: &str, input: U, guard: G) -> Result<Result<T, E>, StoreError>
    where
        G: FnOnce(&T, &U) -> Result<(), E>,
    {
        let update_entity = &self.update_entity;
        let result = self
            .store
            .try_modify(id, |existing| {
                guard(existing, &input)?;
                let mut next = update_entity(existing, input);
                next.meta_mut().rebase(existing.meta());
                Ok(next)
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        tracing::debug!(id = %id, accepted = result.is_ok(), "entity guarded update");
        Ok(result)
    }

    /// Delete an entity if present, returning whether one was removed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.store.delete(id);
        tracing::debug!(id = %id, removed, "entity delete");
        removed
    }

    /// Count all entities, or those matching `filter`.
    pub fn count(&self, filter: Option<&Filter>) -> usize {
        match filter {
            Some(filter) => self.store.filter(|entity| filter.matches(entity)).len(),
            None => self.store.count(),
        }
    }
}
