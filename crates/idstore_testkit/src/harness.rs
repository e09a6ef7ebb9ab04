//! Model-checking harness.
//!
//! Applies operations to a real store and to a plain `BTreeMap` model side
//! by side, then checks that records, counter and index tables agree.

use crate::fixtures::{person_system, Person, PersonSystem};
use crate::generators::Op;
use idstore_core::{Id, Store};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of one applied operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store changed (or stayed equal on a no-op remove).
    Applied,
    /// A unique index rejected the write.
    Rejected,
}

/// A store paired with a reference model.
pub struct ModelHarness {
    /// The system under test.
    pub system: PersonSystem,
    /// Current store.
    pub store: Store<Person>,
    /// Expected records by raw id.
    model: BTreeMap<u64, Person>,
    /// Expected next raw id.
    next: u64,
}

impl ModelHarness {
    /// Creates a harness over the standard person system.
    pub fn new() -> Self {
        let system = person_system();
        let store = system.init_store();
        Self {
            system,
            store,
            model: BTreeMap::new(),
            next: 1,
        }
    }

    fn name_taken_by_other(&self, name: &str, id: u64) -> bool {
        self.model
            .iter()
            .any(|(other, p)| *other != id && p.name == name)
    }

    /// Applies one operation to both store and model.
    ///
    /// Panics if the store accepts or refuses differently from the model.
    pub fn apply(&mut self, op: Op) -> Outcome {
        match op {
            Op::Create(person) => {
                let id = self.next;
                let expect_reject = self.name_taken_by_other(&person.name, id);
                self.next += 1;

                match self.system.try_create(person.clone(), &self.store) {
                    Ok((created, store)) => {
                        assert!(!expect_reject, "create of {person:?} should be rejected");
                        assert_eq!(created.as_u64(), id);
                        self.store = store;
                        self.model.insert(id, person);
                        Outcome::Applied
                    }
                    Err(rejected) => {
                        assert!(expect_reject, "create of {person:?} should succeed");
                        assert_eq!(rejected.id.as_u64(), id);
                        self.store = rejected.store;
                        Outcome::Rejected
                    }
                }
            }
            Op::Insert(id, person) => {
                let raw = id.as_u64();
                let expect_reject = self.name_taken_by_other(&person.name, raw);

                match self.system.insert(id, person.clone(), &self.store) {
                    Some(store) => {
                        assert!(!expect_reject, "insert of {person:?} should be rejected");
                        self.store = store;
                        self.model.insert(raw, person);
                        self.next = self.next.max(raw + 1);
                        Outcome::Applied
                    }
                    None => {
                        assert!(expect_reject, "insert of {person:?} should succeed");
                        Outcome::Rejected
                    }
                }
            }
            Op::Remove(id) => {
                self.store = self.system.remove(id, &self.store);
                self.model.remove(&id.as_u64());
                Outcome::Applied
            }
        }
    }

    /// Verifies records, counter and both index tables against the model.
    pub fn verify(&self) {
        let actual: BTreeMap<u64, Person> = self
            .system
            .to_list(&self.store)
            .into_iter()
            .map(|(id, p)| (id.as_u64(), p))
            .collect();
        assert_eq!(actual, self.model, "record mismatch");
        assert_eq!(self.store.next_id().as_u64(), self.next, "counter mismatch");

        let ix = *self.system.indexes();

        for (raw, person) in &self.model {
            let owner = self
                .system
                .get_id_by(|ix| ix.by_name, &person.name, &self.store)
                .map(Id::as_u64);
            assert_eq!(owner, Some(*raw), "by_name does not point at {person:?}");
        }
        assert_eq!(self.store.index_len(ix.by_name), self.model.len(), "stale by_name keys");

        let mut cities: BTreeMap<&str, BTreeSet<u64>> = BTreeMap::new();
        for (raw, person) in &self.model {
            cities.entry(person.city.as_str()).or_default().insert(*raw);
        }
        for (city, expected) in &cities {
            let ids: BTreeSet<u64> = self
                .system
                .get_ids_by(|ix| ix.by_city, city, &self.store)
                .into_iter()
                .map(Id::as_u64)
                .collect();
            assert_eq!(&ids, expected, "by_city mismatch for {city}");
        }
        assert_eq!(self.store.index_len(ix.by_city), cities.len(), "stale by_city keys");
    }

    /// Returns the number of records in the model.
    pub fn tracked_count(&self) -> usize {
        self.model.len()
    }
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}
