//! User-keyed in-memory store.

use indexmap::IndexMap;
use parking_lot::RwLock;

/// In-memory map from an externally supplied user identifier to one payload.
///
/// Writes are last-write-wins. Used for per-user carts and for sessions.
///
/// # Example
///
/// ```rust,ignore
/// let carts: UserStore<Cart> = UserStore::new();
/// carts.set("user-1", Cart::default());
/// let cart = carts.get_or_default("user-1");
/// ```
pub struct UserStore<T> {
    entries: RwLock<IndexMap<String, T>>,
}

impl<T: Clone> UserStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Get the payload stored for a user.
    pub fn get(&self, user_id: &str) -> Option<T> {
        self.entries.read().get(user_id).cloned()
    }

    /// Store a payload for a user, replacing any previous one.
    pub fn set(&self, user_id: impl Into<String>, data: T) {
        self.entries.write().insert(user_id.into(), data);
    }

    /// Delete a user's payload, returning whether one existed.
    pub fn delete(&self, user_id: &str) -> bool {
        self.entries.write().shift_remove(user_id).is_some()
    }

    /// Check if a user has a payload.
    pub fn contains(&self, user_id: &str) -> bool {
        self.entries.read().contains_key(user_id)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// All user ids with a stored payload.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// All stored payloads.
    pub fn values(&self) -> Vec<T> {
        self.entries.read().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Remove and return a user's payload under a single lock.
    pub fn take(&self, user_id: &str) -> Option<T> {
        self.entries.write().shift_remove(user_id)
    }

    /// Mutate a user's payload in place if one is stored.
    ///
    /// Returns `None`, storing nothing, when the user has no payload.
    pub fn modify<F, R>(&self, user_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.entries.write().get_mut(user_id).map(f)
    }

    /// Remove every entry for which `predicate` returns false.
    pub fn retain<P>(&self, mut predicate: P)
    where
        P: FnMut(&str, &T) -> bool,
    {
        self.entries.write().retain(|key, value| predicate(key, value));
    }
}

impl<T: Clone + Default> UserStore<T> {
    /// Get a user's payload, or the default value if none is stored.
    ///
    /// Does not store the default.
    pub fn get_or_default(&self, user_id: &str) -> T {
        self.get(user_id).unwrap_or_default()
    }

    /// Mutate a user's payload in place under a single lock.
    ///
    /// Starts from the default value if the user has nothing stored.
    pub fn update<F, R>(&self, user_id: &str, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut entries = self.entries.write();
        let entry = entries.entry(user_id.to_string()).or_default();
        f(entry)
    }

    /// Like [`UserStore::update`], but only commits if `f` succeeds.
    ///
    /// `f` works on a copy; on error the stored payload is left untouched.
    pub fn try_update<F, R, E>(&self, user_id: &str, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let mut entries = self.entries.write();
        let mut working = entries.get(user_id).cloned().unwrap_or_default();
        let result = f(&mut working)?;
        entries.insert(user_id.to_string(), working);
        Ok(result)
    }
}

impl<T: Clone> Default for UserStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
