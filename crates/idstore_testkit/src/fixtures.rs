//! Test fixtures and store helpers.
//!
//! Provides a sample record type, a pre-configured system over it and a
//! few ready-made scenarios.

use idstore_core::{Id, Index, Store, StoreConfig, System};

/// Sample record used across the test suites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    /// Unique across the store.
    pub name: String,
    /// Not indexed.
    pub age: u32,
    /// Indexed, non-unique.
    pub city: String,
}

impl Person {
    /// Creates a person.
    pub fn new(name: impl Into<String>, age: u32, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            city: city.into(),
        }
    }
}

/// Index handles of [`person_system`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonIndexes {
    /// Unique index on `name`.
    pub by_name: Index<Person>,
    /// Multi-valued index on `city`.
    pub by_city: Index<Person>,
}

/// System type produced by [`person_system`].
pub type PersonSystem = System<Person, PersonIndexes>;

/// Builds the standard test system: unique `by_name`, multi `by_city`.
pub fn person_system() -> PersonSystem {
    let mut config = StoreConfig::new();
    let by_name = config
        .unique_index("by_name", |p: &Person| p.name.clone())
        .expect("fresh config accepts by_name");
    let by_city = config
        .multi_index("by_city", |p: &Person| p.city.clone())
        .expect("fresh config accepts by_city");
    config.build(PersonIndexes { by_name, by_city })
}

/// Builds a system with only the unique `by_name` index.
pub fn name_only_system() -> System<Person, Index<Person>> {
    let mut config = StoreConfig::new();
    let by_name = config
        .unique_index("by_name", |p: &Person| p.name.clone())
        .expect("fresh config accepts by_name");
    config.build(by_name)
}

/// Runs a test against the standard system and an empty store.
///
/// # Example
///
/// ```rust,ignore
/// with_person_store(|system, store| {
///     let (id, store) = system.create(Person::new("ann", 30, "oslo"), store).unwrap();
///     assert!(store.contains(id));
/// });
/// ```
pub fn with_person_store<F, R>(f: F) -> R
where
    F: FnOnce(&PersonSystem, &Store<Person>) -> R,
{
    let system = person_system();
    let store = system.init_store();
    f(&system, &store)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a store with `count` people named `person_0..`, spread
    /// over three cities.
    pub fn populated_store(system: &PersonSystem, count: usize) -> (Store<Person>, Vec<Id<Person>>) {
        let mut store = system.init_store();
        let mut ids = Vec::with_capacity(count);

        for i in 0..count {
            let person = Person::new(format!("person_{i}"), 20 + (i % 50) as u32, city(i));
            let (id, next) = system
                .create(person, &store)
                .expect("generated names are distinct");
            ids.push(id);
            store = next;
        }

        (store, ids)
    }

    fn city(i: usize) -> &'static str {
        match i % 3 {
            0 => "oslo",
            1 => "rome",
            _ => "lima",
        }
    }
}
