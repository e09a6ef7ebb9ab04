//! Property-based test generators using proptest.
//!
//! Names and cities are drawn from small alphabets so that generated
//! operation sequences collide on index keys often.

use crate::fixtures::Person;
use idstore_core::Id;
use proptest::prelude::*;

/// Strategy for names from a small pool.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]{1,2}").expect("Invalid regex")
}

/// Strategy for cities from a small pool.
pub fn city_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["oslo", "rome", "lima"]).prop_map(String::from)
}

/// Strategy for people.
pub fn person_strategy() -> impl Strategy<Value = Person> {
    (name_strategy(), 0u32..100, city_strategy())
        .prop_map(|(name, age, city)| Person::new(name, age, city))
}

/// Strategy for identifiers in `1..=max`.
pub fn id_strategy(max: u64) -> impl Strategy<Value = Id<Person>> {
    (1..=max).prop_map(|raw| Id::from_raw(raw).expect("range excludes zero"))
}

/// One step of a generated workload.
#[derive(Debug, Clone)]
pub enum Op {
    /// `create(person)`.
    Create(Person),
    /// `insert(id, person)`.
    Insert(Id<Person>, Person),
    /// `remove(id)`.
    Remove(Id<Person>),
}

/// Strategy for a single operation over ids `1..=16`.
pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => person_strategy().prop_map(Op::Create),
        2 => (id_strategy(16), person_strategy()).prop_map(|(id, p)| Op::Insert(id, p)),
        2 => id_strategy(16).prop_map(Op::Remove),
    ]
}

/// Strategy for a workload of up to `max_len` operations.
pub fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..max_len)
}
