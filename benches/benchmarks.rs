use collection_store::{RecordStore, WritePolicy};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

fn bench_dir(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("collection_store_bench_{}_{}", name, size))
}

fn seeded(dir: &PathBuf, size: usize, policy: WritePolicy) -> RecordStore {
    let _ = std::fs::remove_dir_all(dir);
    let store = RecordStore::builder(dir)
        .pretty(false)
        .write_policy(policy)
        .build()
        .unwrap();
    for i in 0..size {
        store.put("units", format!("u{i}"), json!({"hp": i, "name": "scout"})).unwrap();
    }
    store
}

fn bench_get_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_all");
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let dir = bench_dir("get_all", size);
            let store = seeded(&dir, size, WritePolicy::InPlace);
            b.iter(|| black_box(store.get_all("units").unwrap()));
            let _ = std::fs::remove_dir_all(&dir);
        });
    }
}

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [10, 100, 1000] {
        for (label, policy) in [("in_place", WritePolicy::InPlace), ("atomic", WritePolicy::Atomic)] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
                let dir = bench_dir(label, size);
                let store = seeded(&dir, size, policy);
                b.iter(|| store.put("units", "u0", json!({"hp": 1})).unwrap());
                let _ = std::fs::remove_dir_all(&dir);
            });
        }
    }
}

fn bench_delete_absent(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_absent");
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let dir = bench_dir("delete_absent", size);
            let store = seeded(&dir, size, WritePolicy::InPlace);
            b.iter(|| black_box(store.delete("units", "missing").unwrap()));
            let _ = std::fs::remove_dir_all(&dir);
        });
    }
}

criterion_group!(benches, bench_get_all, bench_upsert, bench_delete_absent);
criterion_main!(benches);
