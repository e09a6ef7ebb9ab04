//! End-to-end scenarios over the person system.

use idstore_core::{Id, StoreConfig, StoreError};
use idstore_testkit::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn reject_remove_recreate() {
    init_tracing();
    let system = name_only_system();
    let store = system.init_store();

    let (first, store) = system.create(Person::new("foo", 20, "oslo"), &store).unwrap();
    assert_eq!(first.as_u64(), 1);

    let rejected = system
        .try_create(Person::new("foo", 21, "oslo"), &store)
        .unwrap_err();
    assert!(matches!(rejected.error, StoreError::UniqueViolation { owner: 1, .. }));
    assert_eq!(
        system.to_list(&rejected.store),
        vec![(first, Person::new("foo", 20, "oslo"))]
    );

    let store = system.remove(first, &rejected.store);
    let (second, store) = system.create(Person::new("foo", 21, "oslo"), &store).unwrap();

    // The rejected attempt consumed id 2.
    assert_eq!(second.as_u64(), 3);
    assert_eq!(system.get_by(|ix| *ix, "foo", &store).map(|p| p.age), Some(21));
}

#[test]
fn option_create_keeps_caller_store() {
    let system = name_only_system();
    let (_, store) = system
        .create(Person::new("foo", 20, "oslo"), &system.init_store())
        .unwrap();

    assert!(system.create(Person::new("foo", 21, "oslo"), &store).is_none());
    assert_eq!(store.next_id().as_u64(), 2);
}

#[test]
fn every_unique_index_is_checked() {
    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        email: String,
        handle: String,
    }

    let mut config = StoreConfig::new();
    config.unique_index("by_email", |a: &Account| a.email.clone()).unwrap();
    let by_handle = config
        .unique_index("by_handle", |a: &Account| a.handle.to_lowercase())
        .unwrap();
    let system = config.build(by_handle);

    let account = |email: &str, handle: &str| Account {
        email: email.into(),
        handle: handle.into(),
    };

    let (_, store) = system
        .create(account("a@x.io", "Ann"), &system.init_store())
        .unwrap();

    // First index passes, second refuses: nothing may change.
    let err = system
        .try_insert(Id::from_raw(2).unwrap(), account("b@x.io", "ANN"), &store)
        .unwrap_err();
    assert_eq!(err, StoreError::unique_violation("by_handle", "ann", 1));
    assert_eq!(
        system.get_by(|ix| *ix, "ann", &store).map(|a| a.email.as_str()),
        Some("a@x.io")
    );
    assert_eq!(store.len(), 1);

    let (_, store) = system.create(account("b@x.io", "Bob"), &store).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn populated_store_lookups() {
    let system = person_system();
    let (store, ids) = scenarios::populated_store(&system, 30);

    for (i, id) in ids.iter().enumerate() {
        let name = format!("person_{i}");
        assert_eq!(system.get_id_by(|ix| ix.by_name, &name, &store), Some(*id));
    }
    assert_eq!(system.get_all_by(|ix| ix.by_city, "lima", &store).len(), 10);

    let store = ids
        .iter()
        .step_by(2)
        .fold(store, |store, id| system.remove(*id, &store));
    assert_eq!(store.len(), 15);
    assert_eq!(store.index_len(system.indexes().by_name), 15);
}

#[test]
fn stores_are_independent_values() {
    with_person_store(|system, empty| {
        let (id, one) = system.create(Person::new("a", 1, "oslo"), empty).unwrap();
        let (_, two) = system.create(Person::new("b", 2, "oslo"), &one).unwrap();
        let removed = system.remove(id, &two);

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert_eq!(removed.len(), 1);
        assert_eq!(system.get_ids_by(|ix| ix.by_city, "oslo", &two).len(), 2);
    });
}

#[test]
fn rebuild_from_list() {
    let system = person_system();
    let (store, _) = scenarios::populated_store(&system, 12);

    let rebuilt = system.from_records(system.to_list(&store)).unwrap();
    assert_eq!(rebuilt, store);
}
