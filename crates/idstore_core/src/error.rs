//! Error types for IdStore.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while configuring or mutating a store.
///
/// Lookups and removals never fail. At runtime an insert may hit a
/// uniqueness violation and a create may find the identifier space
/// exhausted; everything else is raised while a
/// [`StoreConfig`](crate::StoreConfig) is being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An insert would map a unique key to a second identifier.
    #[error("unique index '{index}' already maps key {key:?} to record {owner}")]
    UniqueViolation {
        /// Name of the index that rejected the insert.
        index: String,
        /// The derived key that collided.
        key: String,
        /// Raw identifier of the record already owning the key.
        owner: u64,
    },

    /// Every identifier up to `u64::MAX` has been issued.
    #[error("identifier space exhausted")]
    IdSpaceExhausted,

    /// Two indices were registered under the same name.
    #[error("index '{name}' is already defined")]
    DuplicateIndexName {
        /// The repeated name.
        name: String,
    },
}

impl StoreError {
    /// Creates a unique violation error.
    pub fn unique_violation(index: impl Into<String>, key: impl Into<String>, owner: u64) -> Self {
        Self::UniqueViolation {
            index: index.into(),
            key: key.into(),
            owner,
        }
    }

    /// Creates a duplicate index name error.
    pub fn duplicate_index_name(name: impl Into<String>) -> Self {
        Self::DuplicateIndexName { name: name.into() }
    }

    /// Returns true if this error is a uniqueness violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}
