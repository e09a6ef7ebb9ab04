//! The operation set over a configured store.
//!
//! A [`System`] is what [`StoreConfig::build`](crate::StoreConfig::build)
//! produces. It owns the ordered list of index descriptors and is the only
//! way to change a [`Store`]: every write runs one loop over the
//! descriptors, deriving each key and updating a private copy of each
//! index table. Only when every index has accepted the change is a new
//! store assembled.
//!
//! # Invariants
//!
//! - Every index entry references a record present in the primary table
//! - Every record appears under its derived key in every index table
//! - A rejected write leaves the input store untouched
//! - Identifiers are never reused, even after removal

use crate::error::{StoreError, StoreResult};
use crate::id::Id;
use crate::index::{Index, IndexDef, IndexKind, IndexTable};
use crate::store::Store;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A `create` that was refused.
///
/// On a uniqueness violation the identifier was consumed: `store` is the
/// input store with only its counter advanced, so a following `create` on
/// it issues a fresh id. On [`StoreError::IdSpaceExhausted`] `store` is the
/// input store unchanged.
#[derive(Debug, Clone)]
pub struct CreateRejected<T> {
    /// The identifier that was allocated and not used.
    pub id: Id<T>,
    /// Why the insert was refused.
    pub error: StoreError,
    /// The input store with the counter moved past `id`, where possible.
    pub store: Store<T>,
}

/// Read and write operations over stores of `T`.
///
/// `I` is the caller's collection of [`Index`] handles given to
/// [`StoreConfig::build`](crate::StoreConfig::build).
pub struct System<T, I = ()> {
    /// Index descriptors, position = slot.
    defs: Arc<[IndexDef<T>]>,
    /// Caller's handle collection.
    indexes: I,
}

impl<T, I> System<T, I> {
    pub(crate) fn new(defs: Vec<IndexDef<T>>, indexes: I) -> Self {
        Self {
            defs: defs.into(),
            indexes,
        }
    }

    /// Returns the handle collection given at build time.
    pub fn indexes(&self) -> &I {
        &self.indexes
    }

    /// Returns the configured index descriptors in registration order.
    pub fn index_defs(&self) -> &[IndexDef<T>] {
        &self.defs
    }

    /// Returns the name of an index.
    pub fn index_name(&self, index: Index<T>) -> Option<&str> {
        self.defs.get(index.slot()).map(|def| def.name.as_str())
    }

    /// Returns the kind of an index.
    pub fn index_kind(&self, index: Index<T>) -> Option<IndexKind> {
        self.defs.get(index.slot()).map(|def| def.kind)
    }

    /// Creates an empty store with one empty table per index.
    pub fn init_store(&self) -> Store<T> {
        Store::with_tables(self.defs.iter().map(|def| def.kind.empty_table()).collect())
    }

    /// Gets a record by identifier.
    pub fn get<'s>(&self, id: Id<T>, store: &'s Store<T>) -> Option<&'s T> {
        store.get(id)
    }

    /// Looks up the identifier owning `key` in the selected index.
    ///
    /// For a multi-valued index this is the lowest identifier under `key`.
    pub fn get_id_by(
        &self,
        select: impl FnOnce(&I) -> Index<T>,
        key: &str,
        store: &Store<T>,
    ) -> Option<Id<T>> {
        let index = select(&self.indexes);
        store.table(index.slot())?.lookup(key)
    }

    /// Looks up the record owning `key` in the selected index.
    pub fn get_by<'s>(
        &self,
        select: impl FnOnce(&I) -> Index<T>,
        key: &str,
        store: &'s Store<T>,
    ) -> Option<&'s T> {
        let id = self.get_id_by(select, key, store)?;
        store.get(id)
    }

    /// Returns every identifier under `key` in the selected index.
    pub fn get_ids_by(
        &self,
        select: impl FnOnce(&I) -> Index<T>,
        key: &str,
        store: &Store<T>,
    ) -> Vec<Id<T>> {
        let index = select(&self.indexes);
        store
            .table(index.slot())
            .map(|table| table.lookup_all(key))
            .unwrap_or_default()
    }

    /// Returns every record under `key` in the selected index.
    pub fn get_all_by<'s>(
        &self,
        select: impl FnOnce(&I) -> Index<T>,
        key: &str,
        store: &'s Store<T>,
    ) -> Vec<&'s T> {
        self.get_ids_by(select, key, store)
            .into_iter()
            .filter_map(|id| store.get(id))
            .collect()
    }

    /// Copies the store's tables for a write.
    ///
    /// A store built by another system (or `Store::default()`) may lack a
    /// slot or hold a table of the wrong kind there. Such a table is
    /// rebuilt from the store's records so that every index is enforced.
    fn working_tables(&self, store: &Store<T>) -> Vec<IndexTable<T>>
    where
        T: Clone,
    {
        self.defs
            .iter()
            .enumerate()
            .map(|(slot, def)| match store.table(slot) {
                Some(table) if table.kind() == def.kind => table.clone(),
                _ => Self::rebuild_table(def, store),
            })
            .collect()
    }

    /// Builds one index table from all records, lowest id first.
    ///
    /// In a unique table a key already taken keeps its first owner.
    fn rebuild_table(def: &IndexDef<T>, store: &Store<T>) -> IndexTable<T> {
        debug!(index = %def.name, kind = %def.kind, records = store.len(), "rebuilding index table");
        store
            .iter()
            .fold(def.kind.empty_table(), |table, (id, value)| {
                table.insert_or_keep(def.key(value), id)
            })
    }
}

impl<T: Clone, I> System<T, I> {
    /// Inserts `value` at `id`, checking every index.
    ///
    /// Overwrites any record already at `id`; the old record's keys are
    /// released first, so a record may change its own unique key.
    /// Re-inserting an identical record is a no-op that succeeds.
    ///
    /// On a uniqueness violation nothing changes and the error names the
    /// first index that refused.
    pub fn try_insert(&self, id: Id<T>, value: T, store: &Store<T>) -> StoreResult<Store<T>> {
        let previous = store.get(id);
        let mut tables = self.working_tables(store);

        for (table, def) in tables.iter_mut().zip(self.defs.iter()) {
            let key = def.key(&value);
            let mut working = std::mem::replace(table, def.kind.empty_table());

            if let Some(old) = previous {
                let old_key = def.key(old);
                if old_key != key {
                    working = working.remove(&old_key, id);
                }
            }

            let owner = working.lookup(&key);
            match working.try_insert(key.clone(), id) {
                Some(updated) => *table = updated,
                None => {
                    let owner = owner.map_or(0, Id::as_u64);
                    debug!(index = %def.name, key = %key, owner, id = %id, "unique constraint violated");
                    return Err(StoreError::unique_violation(def.name.as_str(), key, owner));
                }
            }
        }

        trace!(id = %id, replaced = previous.is_some(), "inserted record");
        Ok(store.with_record(id, value, tables))
    }

    /// Inserts `value` at `id`.
    ///
    /// Returns `None` if a unique index rejects the record or the
    /// identifier space is exhausted.
    pub fn insert(&self, id: Id<T>, value: T, store: &Store<T>) -> Option<Store<T>> {
        self.try_insert(id, value, store).ok()
    }

    /// Inserts `value` under the next free identifier.
    ///
    /// A rejected create still consumes the identifier; the returned
    /// [`CreateRejected`] carries the store with the counter advanced.
    /// If the counter sits on an occupied `u64::MAX` the create is refused
    /// with [`StoreError::IdSpaceExhausted`] instead of overwriting.
    pub fn try_create(
        &self,
        value: T,
        store: &Store<T>,
    ) -> Result<(Id<T>, Store<T>), CreateRejected<T>> {
        let id = store.next_id();
        if store.contains(id) {
            // The counter saturated at `u64::MAX` and that slot is taken.
            debug!(id = %id, "identifier space exhausted");
            return Err(CreateRejected {
                id,
                error: StoreError::IdSpaceExhausted,
                store: store.clone(),
            });
        }
        match self.try_insert(id, value, store) {
            Ok(store) => Ok((id, store)),
            Err(error) => Err(CreateRejected {
                id,
                error,
                store: store.with_id_consumed(id),
            }),
        }
    }

    /// Inserts `value` under the next free identifier.
    ///
    /// Returns `None` iff a unique index rejects the record.
    ///
    /// On rejection the caller keeps its own store, whose counter has not
    /// moved, so the next `create` reuses the identifier this attempt
    /// allocated. Use [`try_create`](Self::try_create) when a rejected
    /// create must still consume its identifier: its error carries the
    /// store with the counter advanced.
    pub fn create(&self, value: T, store: &Store<T>) -> Option<(Id<T>, Store<T>)> {
        self.try_create(value, store).ok()
    }

    /// Replaces the record at `id` with `f(record)`.
    ///
    /// Returns `None` if there is no record at `id` or the new value
    /// violates a unique index.
    pub fn update(&self, id: Id<T>, f: impl FnOnce(&T) -> T, store: &Store<T>) -> Option<Store<T>> {
        let value = f(store.get(id)?);
        self.insert(id, value, store)
    }

    /// Removes the record at `id` and releases its index keys.
    ///
    /// Removing an absent identifier returns an equal store.
    pub fn remove(&self, id: Id<T>, store: &Store<T>) -> Store<T> {
        let Some(old) = store.get(id) else {
            return store.clone();
        };

        let tables = self
            .working_tables(store)
            .into_iter()
            .zip(self.defs.iter())
            .map(|(table, def)| table.remove(&def.key(old), id))
            .collect();

        trace!(id = %id, "removed record");
        store.without_record(id, tables)
    }

    /// Returns a snapshot of all records.
    pub fn to_list(&self, store: &Store<T>) -> Vec<(Id<T>, T)> {
        store.iter().map(|(id, value)| (id, value.clone())).collect()
    }

    /// Builds a store from existing `(id, record)` pairs.
    ///
    /// Every pair goes through [`try_insert`](Self::try_insert); the first
    /// violation aborts the load. The counter ends past the largest id.
    pub fn from_records(
        &self,
        records: impl IntoIterator<Item = (Id<T>, T)>,
    ) -> StoreResult<Store<T>> {
        records
            .into_iter()
            .try_fold(self.init_store(), |store, (id, value)| {
                self.try_insert(id, value, &store)
            })
    }
}

impl<T, I: Clone> Clone for System<T, I> {
    fn clone(&self) -> Self {
        Self {
            defs: Arc::clone(&self.defs),
            indexes: self.indexes.clone(),
        }
    }
}

impl<T, I: fmt::Debug> fmt::Debug for System<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("defs", &self.defs)
            .field("indexes", &self.indexes)
            .finish()
    }
}
