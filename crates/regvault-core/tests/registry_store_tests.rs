//! Integration tests for the registry store contract.
//!
//! Each test provisions its own `TestStore`, so no rows leak between cases.

use regvault::testing::TestStore;
use regvault::{ErrorKind, Registry, RegistryStore, SqliteRegistryStore};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_registry_find() {
    let store = TestStore::new().unwrap();

    store
        .create(
            &mut Registry::new(1, "index.docker.io")
                .with_username("foo")
                .with_password("bar")
                .with_email("foo@bar.com")
                .with_token("12345"),
        )
        .unwrap();

    let registry = store.find(1, "index.docker.io").unwrap();
    assert_eq!(registry.repo_id, 1);
    assert_eq!(registry.address, "index.docker.io");
    assert_eq!(registry.username, "foo");
    assert_eq!(registry.password, "bar");
    assert_eq!(registry.email, "foo@bar.com");
    assert_eq!(registry.token, "12345");
}

#[test]
fn test_registry_list() {
    let store = TestStore::new().unwrap();

    store
        .create(
            &mut Registry::new(1, "index.docker.io")
                .with_username("foo")
                .with_password("bar"),
        )
        .unwrap();
    store
        .create(
            &mut Registry::new(1, "foo.docker.io")
                .with_username("foo")
                .with_password("bar"),
        )
        .unwrap();

    assert_eq!(store.list(1).unwrap().len(), 2);
    assert!(store.list(2).unwrap().is_empty());
}

#[test]
fn test_registry_update() {
    let store = TestStore::new().unwrap();

    let mut registry = Registry::new(1, "index.docker.io")
        .with_username("foo")
        .with_password("bar");
    store.create(&mut registry).unwrap();

    registry.password = "qux".to_string();
    store.update(&registry).unwrap();

    let updated = store.find(1, "index.docker.io").unwrap();
    assert_eq!(updated.password, "qux");
    assert_eq!(updated.username, "foo");
    assert_eq!(updated.id, registry.id);
}

#[test]
fn test_registry_indexes() {
    let store = TestStore::new().unwrap();

    store
        .create(
            &mut Registry::new(1, "index.docker.io")
                .with_username("foo")
                .with_password("bar"),
        )
        .unwrap();

    // fail due to duplicate addr
    let err = store
        .create(
            &mut Registry::new(1, "index.docker.io")
                .with_username("baz")
                .with_password("qux"),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

    let original = store.find(1, "index.docker.io").unwrap();
    assert_eq!(original.username, "foo");
    assert_eq!(original.password, "bar");
}

#[test]
fn test_same_address_in_different_repos() {
    let store = TestStore::new().unwrap();

    let mut first = Registry::new(1, "index.docker.io").with_password("one");
    let mut second = Registry::new(2, "index.docker.io").with_password("two");
    store.create(&mut first).unwrap();
    store.create(&mut second).unwrap();

    assert_eq!(store.find(1, "index.docker.io").unwrap().password, "one");
    assert_eq!(store.find(2, "index.docker.io").unwrap().password, "two");
}

#[test]
fn test_not_found() {
    let store = TestStore::new().unwrap();
    let mut registry = Registry::new(1, "index.docker.io");
    store.create(&mut registry).unwrap();

    let err = store.find(1, "ghcr.io").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = store.find(2, "index.docker.io").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let missing = Registry {
        id: Some(registry.id.unwrap() + 100),
        ..registry.clone()
    };
    let err = store.update(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_returned_values_are_independent_copies() {
    let store = TestStore::new().unwrap();
    let mut registry = Registry::new(1, "index.docker.io").with_password("bar");
    store.create(&mut registry).unwrap();

    let mut found = store.find(1, "index.docker.io").unwrap();
    found.password = "changed".to_string();
    registry.password = "changed too".to_string();

    assert_eq!(store.find(1, "index.docker.io").unwrap().password, "bar");
}

#[test]
fn test_concurrent_creates_commit_once() {
    const WRITERS: usize = 8;

    let store = TestStore::new().unwrap();
    let stores: Vec<SqliteRegistryStore> = (0..WRITERS)
        .map(|_| SqliteRegistryStore::open_at(store.db_path()).unwrap())
        .collect();
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = stores
        .into_iter()
        .enumerate()
        .map(|(i, writer)| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut registry =
                    Registry::new(1, "index.docker.io").with_username(format!("writer-{}", i));
                barrier.wait();
                writer.create(&mut registry).map_err(|e| e.kind())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|kind| *kind == ErrorKind::ConstraintViolation));
    assert_eq!(store.list(1).unwrap().len(), 1);
}

#[test]
fn test_shared_store_across_threads() {
    let store = Arc::new(SqliteRegistryStore::open_in_memory().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|repo_id| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for address in ["index.docker.io", "ghcr.io", "quay.io"] {
                    store.create(&mut Registry::new(repo_id, address)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for repo_id in 0..4 {
        assert_eq!(store.list(repo_id).unwrap().len(), 3);
    }
}
