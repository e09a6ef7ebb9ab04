//! The immutable store value.

use crate::id::Id;
use crate::index::{Index, IndexTable};
use std::collections::BTreeMap;

/// An immutable collection of records of type `T`.
///
/// A `Store` holds:
/// - the primary table, identifier to record
/// - the next identifier to issue
/// - one table per configured index
///
/// Stores are plain values. Every write goes through a
/// [`System`](crate::System), which returns a new `Store` and leaves its
/// argument untouched; a host application typically keeps the current
/// store as a field of its own state and replaces it wholesale.
///
/// # Example
///
/// ```rust,ignore
/// let store = system.init_store();
/// let (id, store) = system.create(user, &store).unwrap();
/// assert!(store.contains(id));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store<T> {
    /// Primary table.
    data: BTreeMap<Id<T>, T>,
    /// Next identifier to issue.
    next_id: Id<T>,
    /// Index tables by slot.
    tables: Vec<IndexTable<T>>,
}

impl<T> Store<T> {
    /// Creates an empty store holding the given (empty) index tables.
    pub(crate) fn with_tables(tables: Vec<IndexTable<T>>) -> Self {
        Self {
            data: BTreeMap::new(),
            next_id: Id::first(),
            tables,
        }
    }

    /// Gets a record by identifier.
    #[must_use]
    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.data.get(&id)
    }

    /// Checks if a record exists.
    #[must_use]
    pub fn contains(&self, id: Id<T>) -> bool {
        self.data.contains_key(&id)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the identifier the next `create` will use.
    #[must_use]
    pub fn next_id(&self) -> Id<T> {
        self.next_id
    }

    /// Iterates over all records.
    ///
    /// The order is stable for a given store value; callers should not
    /// rely on it beyond that.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> + '_ {
        self.data.iter().map(|(id, value)| (*id, value))
    }

    /// Returns the number of keys in one index table.
    ///
    /// Returns 0 for a handle this store has no table for.
    #[must_use]
    pub fn index_len(&self, index: Index<T>) -> usize {
        self.table(index.slot()).map_or(0, IndexTable::len)
    }

    pub(crate) fn table(&self, slot: usize) -> Option<&IndexTable<T>> {
        self.tables.get(slot)
    }
}

impl<T: Clone> Store<T> {
    /// Writes `value` at `id` and installs `tables`, overwriting any
    /// previous record. No constraint checks happen here.
    ///
    /// The counter is moved past `id` so that `create` never hands out an
    /// identifier a caller inserted explicitly. It saturates at
    /// `u64::MAX`.
    pub(crate) fn with_record(&self, id: Id<T>, value: T, tables: Vec<IndexTable<T>>) -> Self {
        let mut data = self.data.clone();
        data.insert(id, value);
        Self {
            data,
            next_id: self.next_id.max(id.saturating_next()),
            tables,
        }
    }

    /// Removes the record at `id` and installs `tables`.
    pub(crate) fn without_record(&self, id: Id<T>, tables: Vec<IndexTable<T>>) -> Self {
        let mut data = self.data.clone();
        data.remove(&id);
        Self {
            data,
            next_id: self.next_id,
            tables,
        }
    }

    /// Returns a copy whose counter has moved past `id`.
    pub(crate) fn with_id_consumed(&self, id: Id<T>) -> Self {
        Self {
            data: self.data.clone(),
            next_id: self.next_id.max(id.saturating_next()),
            tables: self.tables.clone(),
        }
    }
}

impl<T> Default for Store<T> {
    /// An empty store without index tables.
    fn default() -> Self {
        Self::with_tables(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;

    fn id(raw: u64) -> Id<String> {
        Id::from_raw(raw).unwrap()
    }

    #[test]
    fn empty_store() {
        let store: Store<String> = Store::default();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.next_id(), Id::first());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn with_record_overwrites() {
        let store: Store<String> = Store::default();
        let store = store.with_record(id(1), "a".into(), Vec::new());
        let store = store.with_record(id(1), "b".into(), Vec::new());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id(1)).map(String::as_str), Some("b"));
    }

    #[test]
    fn with_record_leaves_original() {
        let before: Store<String> = Store::default();
        let after = before.with_record(id(1), "a".into(), Vec::new());

        assert!(before.is_empty());
        assert!(after.contains(id(1)));
    }

    #[test]
    fn counter_moves_past_explicit_id() {
        let store: Store<String> = Store::default();
        let store = store.with_record(id(5), "a".into(), Vec::new());
        assert_eq!(store.next_id(), id(6));

        // A lower id never moves the counter back.
        let store = store.with_record(id(2), "b".into(), Vec::new());
        assert_eq!(store.next_id(), id(6));
    }

    #[test]
    fn counter_saturates_at_max_id() {
        let max = id(u64::MAX);
        let store: Store<String> = Store::default().with_record(max, "z".into(), Vec::new());
        assert_eq!(store.next_id(), max);
        assert_eq!(store.get(max).map(String::as_str), Some("z"));

        let consumed = Store::<String>::default().with_id_consumed(max);
        assert_eq!(consumed.next_id(), max);
    }

    #[test]
    fn without_record_absent_is_noop() {
        let store: Store<String> = Store::default().with_record(id(1), "a".into(), Vec::new());
        let same = store.without_record(id(9), store.tables.clone());
        assert_eq!(same, store);
    }

    #[test]
    fn removal_keeps_counter() {
        let store: Store<String> = Store::default().with_record(id(1), "a".into(), Vec::new());
        let store = store.without_record(id(1), Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.next_id(), id(2));
    }

    #[test]
    fn index_len_unknown_slot() {
        let store: Store<String> = Store::with_tables(vec![IndexKind::Unique.empty_table()]);
        assert_eq!(store.index_len(Index::new(0)), 0);
        assert_eq!(store.index_len(Index::new(3)), 0);
    }

    #[test]
    fn iter_yields_all() {
        let store: Store<String> = Store::default()
            .with_record(id(2), "b".into(), Vec::new())
            .with_record(id(1), "a".into(), Vec::new());

        let mut seen: Vec<_> = store.iter().map(|(id, v)| (id.as_u64(), v.clone())).collect();
        seen.sort();
        assert_eq!(seen, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }
}
