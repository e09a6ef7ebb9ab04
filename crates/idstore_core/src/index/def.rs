//! Index descriptors and handles.

use crate::index::table::{IndexTable, MultiTable, UniqueTable};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Key-derivation function for an index.
///
/// Must be pure: the same record always derives the same key.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Type of index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// At most one record per key; colliding inserts are rejected.
    Unique,
    /// Any number of records per key.
    Multi,
}

impl IndexKind {
    /// Creates an empty table of this kind.
    #[must_use]
    pub fn empty_table<T>(self) -> IndexTable<T> {
        match self {
            Self::Unique => IndexTable::Unique(UniqueTable::new()),
            Self::Multi => IndexTable::Multi(MultiTable::new()),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unique => write!(f, "unique"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// A configured index: name, kind and key function.
///
/// Descriptors are kept in registration order by the
/// [`System`](crate::System); the position is the index slot.
pub struct IndexDef<T> {
    /// Name used in diagnostics and errors.
    pub name: String,
    /// Whether the index enforces uniqueness.
    pub kind: IndexKind,
    /// Derives the key for a record.
    pub key_fn: KeyFn<T>,
}

impl<T> IndexDef<T> {
    /// Creates a new descriptor.
    pub fn new(
        name: impl Into<String>,
        kind: IndexKind,
        key_fn: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            key_fn: Arc::new(key_fn),
        }
    }

    /// Derives the key for `value`.
    #[inline]
    pub fn key(&self, value: &T) -> String {
        (self.key_fn)(value)
    }

    /// Returns true if the index enforces uniqueness.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.kind == IndexKind::Unique
    }
}

impl<T> Clone for IndexDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            key_fn: Arc::clone(&self.key_fn),
        }
    }
}

impl<T> fmt::Debug for IndexDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Handle selecting one configured index on records of type `T`.
///
/// Handles are returned by [`StoreConfig`](crate::StoreConfig) when an
/// index is registered and carry nothing but the index slot.
pub struct Index<T> {
    slot: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    pub(crate) const fn new(slot: usize) -> Self {
        Self {
            slot,
            _marker: PhantomData,
        }
    }

    /// Returns the slot of the index table inside a store.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.slot
    }
}

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl<T> Eq for Index<T> {}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({})", self.slot)
    }
}
