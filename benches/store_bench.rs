//! Benchmarks for SnapKV store operations

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use snapkv::{Config, Format, MemoryBackend, Store};

fn manual_store(format: Format) -> Store<String> {
    let config = Config::builder()
        .flush_period(Duration::ZERO)
        .format(format)
        .build();
    Store::with_backend(config, MemoryBackend::new()).expect("memory backend never fails to load")
}

fn populated_store(format: Format, entries: usize) -> Store<String> {
    let store = manual_store(format);
    for i in 0..entries {
        store.set(format!("key{}", i), format!("value{}", i));
    }
    store
}

fn store_benchmarks(c: &mut Criterion) {
    // Single key write throughput
    c.bench_function("set", |b| {
        let store = manual_store(Format::Json);
        let mut i = 0u64;
        b.iter(|| {
            store.set(format!("key{}", i % 10_000), "value".to_string());
            i += 1;
        })
    });

    // Single key read throughput
    c.bench_function("get_hit", |b| {
        let store = populated_store(Format::Json, 10_000);
        let mut i = 0u64;
        b.iter(|| {
            black_box(store.get(&format!("key{}", i % 10_000)));
            i += 1;
        })
    });

    // Mixed read/write workload with concurrent readers
    c.bench_function("set_with_4_readers", |b| {
        let store = Arc::new(populated_store(Format::Json, 1_000));
        b.iter(|| {
            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || {
                        for i in 0..250 {
                            black_box(store.get(&format!("key{}", i)));
                        }
                    })
                })
                .collect();
            for i in 0..250 {
                store.set(format!("key{}", i), "updated".to_string());
            }
            for reader in readers {
                reader.join().expect("reader thread panicked");
            }
        })
    });

    // Whole-map snapshot cost per format
    let mut group = c.benchmark_group("flush");
    for entries in [100usize, 10_000] {
        for format in [Format::Json, Format::Bincode] {
            let store = populated_store(format, entries);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", format), entries),
                &entries,
                |b, _| b.iter(|| store.flush().expect("memory backend write")),
            );
        }
    }
    group.finish();

    c.bench_function("all_10k", |b| {
        let store = populated_store(Format::Json, 10_000);
        b.iter(|| black_box(store.all()))
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
