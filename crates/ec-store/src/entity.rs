//! Base entity shape, field values and equality filters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Generate a fresh entity identifier (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identity and timestamps shared by every stored entity.
///
/// The identifier and creation timestamp are fixed at construction. The
/// update timestamp only moves forward through [`EntityMeta::touch`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMeta {
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntityMeta {
    /// Create metadata for a new entity with a generated id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create metadata with a fixed id and creation time (seed data).
    pub fn seeded(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            updated_at: created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Refresh the update timestamp.
    ///
    /// The new value is strictly greater than the previous one even when the
    /// clock has not advanced between two mutations.
    pub fn touch(&mut self) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = Utc::now().max(floor);
    }

    /// Re-impose an existing entity's identity onto this one and touch it.
    pub(crate) fn rebase(&mut self, existing: &EntityMeta) {
        self.id = existing.id.clone();
        self.created_at = existing.created_at;
        self.updated_at = existing.updated_at;
        self.touch();
    }

    pub(crate) fn reassign_id(&mut self) {
        self.id = generate_id();
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A record that can live in an [`EntityStore`](crate::EntityStore).
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identity and timestamps.
    fn meta(&self) -> &EntityMeta;

    /// Mutable access to the metadata, used to refresh timestamps.
    fn meta_mut(&mut self) -> &mut EntityMeta;

    /// Value of a named field for equality filtering.
    ///
    /// Returns `None` for fields the entity does not expose; such fields
    /// never match a filter.
    fn field(&self, _name: &str) -> Option<FieldValue> {
        None
    }

    fn id(&self) -> &str {
        self.meta().id()
    }
}

/// A filterable field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Field-equality filter.
///
/// Every listed field must equal its expected value. An empty filter matches
/// everything; callers express "no filter" with `Option<Filter>::None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    fields: BTreeMap<String, FieldValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected field value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Add an expected field value only if one is given.
    pub fn with_opt<V: Into<FieldValue>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(field, value),
            None => self,
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether an entity satisfies every field of this filter.
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        self.fields
            .iter()
            .all(|(name, expected)| entity.field(name).as_ref() == Some(expected))
    }
}
