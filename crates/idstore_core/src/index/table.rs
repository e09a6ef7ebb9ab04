//! Index tables: derived key to owning record(s).

use crate::id::Id;
use crate::index::IndexKind;
use std::collections::{BTreeSet, HashMap};

/// Unique index table: each key maps to exactly one record.
///
/// Claiming a key that another record already owns is refused; claiming a
/// key the same record already owns is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueTable<T> {
    entries: HashMap<String, Id<T>>,
}

impl<T> UniqueTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the owner of `key`, if any.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Id<T>> {
        self.entries.get(key).copied()
    }

    /// Adds `key -> id`.
    ///
    /// Returns `None` if `key` is already owned by a different record.
    #[must_use]
    pub fn try_insert(mut self, key: String, id: Id<T>) -> Option<Self> {
        match self.entries.get(&key) {
            Some(owner) if *owner != id => None,
            Some(_) => Some(self),
            None => {
                self.entries.insert(key, id);
                Some(self)
            }
        }
    }

    /// Adds `key -> id` unless `key` already has an owner.
    #[must_use]
    pub fn insert_or_keep(mut self, key: String, id: Id<T>) -> Self {
        self.entries.entry(key).or_insert(id);
        self
    }

    /// Removes `key` whoever owns it. Absent keys are ignored.
    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        self.entries.remove(key);
        self
    }

    /// Returns true if `key` has an owner.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for UniqueTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Multi-valued index table: each key maps to a set of records.
///
/// Never refuses an insert. Empty sets are dropped so that `len` counts
/// only keys with at least one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiTable<T> {
    entries: HashMap<String, BTreeSet<Id<T>>>,
}

impl<T> MultiTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns all records under `key`, lowest identifier first.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Vec<Id<T>> {
        self.entries
            .get(key)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the lowest identifier under `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<Id<T>> {
        self.entries.get(key).and_then(|set| set.first().copied())
    }

    /// Adds `id` under `key`.
    #[must_use]
    pub fn insert(mut self, key: String, id: Id<T>) -> Self {
        self.entries.entry(key).or_default().insert(id);
        self
    }

    /// Removes `id` from `key`'s set.
    #[must_use]
    pub fn remove(mut self, key: &str, id: Id<T>) -> Self {
        if let Some(set) = self.entries.get_mut(key) {
            set.remove(&id);
            if set.is_empty() {
                self.entries.remove(key);
            }
        }
        self
    }

    /// Returns true if `key` has at least one record.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for MultiTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One secondary index table held inside a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTable<T> {
    /// At most one record per key.
    Unique(UniqueTable<T>),
    /// Any number of records per key.
    Multi(MultiTable<T>),
}

impl<T> IndexTable<T> {
    /// Returns the kind of this table.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Unique(_) => IndexKind::Unique,
            Self::Multi(_) => IndexKind::Multi,
        }
    }

    /// Returns the (lowest) record under `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Id<T>> {
        match self {
            Self::Unique(table) => table.lookup(key),
            Self::Multi(table) => table.first(key),
        }
    }

    /// Returns every record under `key`.
    #[must_use]
    pub fn lookup_all(&self, key: &str) -> Vec<Id<T>> {
        match self {
            Self::Unique(table) => table.lookup(key).into_iter().collect(),
            Self::Multi(table) => table.lookup(key),
        }
    }

    /// Adds `key -> id`, returning `None` on a uniqueness violation.
    ///
    /// Multi-valued tables always succeed.
    #[must_use]
    pub fn try_insert(self, key: String, id: Id<T>) -> Option<Self> {
        match self {
            Self::Unique(table) => table.try_insert(key, id).map(Self::Unique),
            Self::Multi(table) => Some(Self::Multi(table.insert(key, id))),
        }
    }

    /// Adds `key -> id`, keeping an existing owner in a unique table.
    ///
    /// Used when rebuilding a table from records.
    #[must_use]
    pub fn insert_or_keep(self, key: String, id: Id<T>) -> Self {
        match self {
            Self::Unique(table) => Self::Unique(table.insert_or_keep(key, id)),
            Self::Multi(table) => Self::Multi(table.insert(key, id)),
        }
    }

    /// Releases `key` held by `id`.
    ///
    /// Unique tables drop the key outright; multi-valued tables drop only
    /// `id` from the key's set.
    #[must_use]
    pub fn remove(self, key: &str, id: Id<T>) -> Self {
        match self {
            Self::Unique(table) => Self::Unique(table.remove(key)),
            Self::Multi(table) => Self::Multi(table.remove(key, id)),
        }
    }

    /// Returns true if `key` is mapped.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Self::Unique(table) => table.contains_key(key),
            Self::Multi(table) => table.contains_key(key),
        }
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unique(table) => table.len(),
            Self::Multi(table) => table.len(),
        }
    }

    /// Returns true if no key is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec;

    fn id(raw: u64) -> Id<Rec> {
        Id::from_raw(raw).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let table = UniqueTable::new().try_insert("foo".into(), id(1)).unwrap();
        assert_eq!(table.lookup("foo"), Some(id(1)));
        assert_eq!(table.lookup("bar"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unique_rejects_other_owner() {
        let table = UniqueTable::new().try_insert("foo".into(), id(1)).unwrap();
        assert!(table.try_insert("foo".into(), id(2)).is_none());
    }

    #[test]
    fn unique_reinsert_same_owner() {
        let table = UniqueTable::new().try_insert("foo".into(), id(1)).unwrap();
        let again = table.clone().try_insert("foo".into(), id(1)).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn unique_remove_absent_is_noop() {
        let table = UniqueTable::new().try_insert("foo".into(), id(1)).unwrap();
        let same = table.clone().remove("bar");
        assert_eq!(same, table);

        let empty = same.remove("foo");
        assert!(empty.is_empty());
    }

    #[test]
    fn multi_collects_owners() {
        let table = MultiTable::new()
            .insert("x".into(), id(3))
            .insert("x".into(), id(1))
            .insert("y".into(), id(2));

        assert_eq!(table.lookup("x"), vec![id(1), id(3)]);
        assert_eq!(table.first("x"), Some(id(1)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn multi_remove_one_of_many() {
        let table = MultiTable::new()
            .insert("x".into(), id(1))
            .insert("x".into(), id(2))
            .remove("x", id(1));
        assert_eq!(table.lookup("x"), vec![id(2)]);

        let table = table.remove("x", id(2));
        assert!(!table.contains_key("x"));
        assert!(table.is_empty());
    }

    #[test]
    fn enum_dispatch() {
        let unique = IndexTable::Unique(UniqueTable::new())
            .try_insert("k".into(), id(1))
            .unwrap();
        assert!(unique.clone().try_insert("k".into(), id(2)).is_none());
        assert_eq!(unique.lookup_all("k"), vec![id(1)]);

        let multi = IndexTable::Multi(MultiTable::new())
            .try_insert("k".into(), id(1))
            .and_then(|t| t.try_insert("k".into(), id(2)))
            .unwrap();
        assert_eq!(multi.lookup("k"), Some(id(1)));
        assert_eq!(multi.lookup_all("k").len(), 2);

        let multi = multi.remove("k", id(1));
        assert_eq!(multi.lookup("k"), Some(id(2)));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn key() -> impl Strategy<Value = String> {
            prop::string::string_regex("[a-c]{1,2}").expect("Invalid regex")
        }

        fn entries() -> impl Strategy<Value = Vec<(String, u64)>> {
            prop::collection::vec((key(), 1u64..8), 0..24)
        }

        proptest! {
            #[test]
            fn reinsert_same_owner_is_idempotent(pairs in entries()) {
                let table = pairs.iter().fold(UniqueTable::new(), |table, (k, raw)| {
                    table.insert_or_keep(k.clone(), id(*raw))
                });

                for (k, _) in &pairs {
                    let owner = table.lookup(k).unwrap();
                    let again = table.clone().try_insert(k.clone(), owner).unwrap();
                    prop_assert_eq!(&again, &table);
                }
            }

            #[test]
            fn other_owner_is_rejected(pairs in entries(), k in key(), raw in 1u64..8) {
                let table = pairs.iter().fold(UniqueTable::new(), |table, (k, raw)| {
                    table.insert_or_keep(k.clone(), id(*raw))
                });

                let result = table.clone().try_insert(k.clone(), id(raw));
                match table.lookup(&k) {
                    Some(owner) if owner != id(raw) => prop_assert!(result.is_none()),
                    _ => {
                        let updated = result.unwrap();
                        prop_assert_eq!(updated.lookup(&k), Some(id(raw)));
                    }
                }
            }

            #[test]
            fn multi_never_rejects(pairs in entries()) {
                let table = pairs.iter().try_fold(IndexTable::Multi(MultiTable::new()), |table, (k, raw)| {
                    table.try_insert(k.clone(), id(*raw))
                });
                let table = table.unwrap();

                for (k, raw) in &pairs {
                    prop_assert!(table.lookup_all(k).contains(&id(*raw)));
                }
            }
        }
    }
}
