//! Benchmark utilities.

use idstore_core::Store;
use idstore_testkit::{Person, PersonSystem};
use rand::Rng;

const CITIES: [&str; 4] = ["oslo", "rome", "lima", "kyiv"];

/// Generate `count` people with distinct names and random ages/cities.
pub fn generate_people(count: usize) -> Vec<Person> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let city = CITIES[rng.gen_range(0..CITIES.len())];
            Person::new(format!("person_{i}"), rng.gen_range(18..90), city)
        })
        .collect()
}

/// Builds a store holding `people`.
pub fn populate(system: &PersonSystem, people: &[Person]) -> Store<Person> {
    people.iter().fold(system.init_store(), |store, person| {
        system
            .create(person.clone(), &store)
            .map_or(store, |(_, next)| next)
    })
}
