//! Store error types.

use thiserror::Error;

/// Errors raised by the data layer.
///
/// Lookups and deletes never fail; only updates against a missing
/// identifier do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entity exists with the given identifier.
    #[error("Entity with id {0} not found")]
    NotFound(String),
}

impl StoreError {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
