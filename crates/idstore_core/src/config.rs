//! Store configuration.

use crate::error::{StoreError, StoreResult};
use crate::index::{Index, IndexDef, IndexKind};
use crate::system::System;
use std::fmt;
use tracing::debug;

/// Builder for a [`System`].
///
/// Indices are registered one at a time; each registration returns the
/// [`Index`] handle for later lookups. [`build`](Self::build) consumes the
/// configuration, so nothing of it survives at runtime beyond the ordered
/// list of index descriptors.
///
/// # Example
///
/// ```rust,ignore
/// let mut config = StoreConfig::new();
/// let by_name = config.unique_index("by_name", |u: &User| u.name.clone())?;
/// let by_city = config.multi_index("by_city", |u: &User| u.city.clone())?;
/// let system = config.build(UserIndexes { by_name, by_city });
/// ```
pub struct StoreConfig<T> {
    /// Index descriptors in registration order.
    defs: Vec<IndexDef<T>>,
}

impl<T> StoreConfig<T> {
    /// Creates a configuration without indices.
    #[must_use]
    pub fn new() -> Self {
        Self { defs: Vec::new() }
    }

    /// Registers a unique index.
    ///
    /// Inserts whose key is already owned by another record are rejected.
    pub fn unique_index(
        &mut self,
        name: impl Into<String>,
        key_fn: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> StoreResult<Index<T>> {
        self.add_index(IndexDef::new(name, IndexKind::Unique, key_fn))
    }

    /// Registers a multi-valued index.
    pub fn multi_index(
        &mut self,
        name: impl Into<String>,
        key_fn: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> StoreResult<Index<T>> {
        self.add_index(IndexDef::new(name, IndexKind::Multi, key_fn))
    }

    /// Registers an index from a prepared descriptor.
    ///
    /// Fails if an index with the same name already exists.
    pub fn add_index(&mut self, def: IndexDef<T>) -> StoreResult<Index<T>> {
        if self.defs.iter().any(|existing| existing.name == def.name) {
            return Err(StoreError::duplicate_index_name(def.name));
        }

        let handle = Index::new(self.defs.len());
        debug!(index = %def.name, kind = %def.kind, slot = handle.slot(), "registered index");
        self.defs.push(def);
        Ok(handle)
    }

    /// Returns the number of registered indices.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.defs.len()
    }

    /// Finishes configuration.
    ///
    /// `indexes` is the caller's collection of handles (typically a small
    /// struct of [`Index`] fields); it is handed back by
    /// [`System::indexes`] and to the selectors of
    /// [`System::get_by`].
    #[must_use]
    pub fn build<I>(self, indexes: I) -> System<T, I> {
        debug!(
            indices = self.defs.len(),
            names = ?self.defs.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "built store system"
        );
        System::new(self.defs, indexes)
    }

    /// Finishes configuration without a handle collection.
    #[must_use]
    pub fn build_default(self) -> System<T> {
        self.build(())
    }
}

impl<T> Default for StoreConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StoreConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("defs", &self.defs)
            .finish()
    }
}
