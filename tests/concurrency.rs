use collection_store::{RecordStore, WritePolicy};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn exclusive_store_keeps_every_concurrent_upsert() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        RecordStore::builder(dir.path())
            .pretty(false)
            .exclusive(true)
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store.put("units", format!("t{t}-{i}"), json!(i)).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.get_all("units").unwrap().len(), 8 * 25);
}

#[test]
fn exclusive_locks_are_per_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RecordStore::builder(dir.path()).exclusive(true).build().unwrap());

    let names = ["units", "weapons", "ammo", "factions", "groups"];
    let handles: Vec<_> = names
        .into_iter()
        .map(|name| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    store.put(name, format!("{name}{i}"), json!(i)).unwrap();
                }
                store.delete(name, &format!("{name}0")).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for name in names {
        let coll = store.get_all(name).unwrap();
        assert_eq!(coll.len(), 9, "{name}");
        assert!(!coll.contains_key(&format!("{name}0")));
    }
}

#[test]
fn atomic_writes_never_expose_torn_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        RecordStore::builder(dir.path())
            .write_policy(WritePolicy::Atomic)
            .build()
            .unwrap(),
    );
    let padding = "x".repeat(2048);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            let padding = padding.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    // last writer wins, but every save and every read must succeed
                    store
                        .put("units", format!("t{t}-{i}"), json!({"padding": padding}))
                        .unwrap();
                    let units = store.get_all("units").unwrap();
                    assert!(!units.is_empty());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let units = store.get_all("units").unwrap();
    assert!(!units.is_empty());
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| !e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".json"))
        .count();
    assert_eq!(leftovers, 0);
}
