//! Throughput Benchmark for spacekv
//!
//! This benchmark measures the performance of the record store
//! under various workloads.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spacekv::storage::{MemoryBackend, RecordStore};
use std::sync::Arc;
use std::time::Duration;

/// Benchmark PUT operations
fn bench_put(c: &mut Criterion) {
    let store = Arc::new(RecordStore::new(MemoryBackend::new()));

    let mut group = c.benchmark_group("put");
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i);
            store
                .put("bench", &key, Bytes::from("small_value"), None)
                .unwrap();
            i += 1;
        });
    });

    group.bench_function("put_medium", |b| {
        let mut i = 0u64;
        let value = Bytes::from("x".repeat(1024)); // 1KB value
        b.iter(|| {
            let key = format!("key:{}", i);
            store.put("bench", &key, value.clone(), None).unwrap();
            i += 1;
        });
    });

    group.bench_function("put_large", |b| {
        let mut i = 0u64;
        let value = Bytes::from("x".repeat(64 * 1024)); // 64KB value
        b.iter(|| {
            let key = format!("key:{}", i);
            store.put("bench", &key, value.clone(), None).unwrap();
            i += 1;
        });
    });

    group.bench_function("put_overwrite", |b| {
        store
            .put("bench", "hot", Bytes::from("seed"), None)
            .unwrap();
        b.iter(|| {
            black_box(
                store
                    .put("bench", "hot", Bytes::from("value"), None)
                    .unwrap(),
            );
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let store = Arc::new(RecordStore::new(MemoryBackend::new()));

    // Pre-populate with data
    for i in 0..100_000 {
        let key = format!("key:{}", i);
        store
            .put("bench", &key, Bytes::from(format!("value:{}", i)), None)
            .unwrap();
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(store.get("bench", &key).unwrap());
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing:{}", i);
            black_box(store.get("bench", &key).is_err());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark mixed workload (80% reads, 20% writes)
fn bench_mixed(c: &mut Criterion) {
    let store = Arc::new(RecordStore::new(MemoryBackend::new()));

    // Pre-populate
    for i in 0..10_000 {
        let key = format!("key:{}", i);
        store
            .put("bench", &key, Bytes::from(format!("value:{}", i)), None)
            .unwrap();
    }

    let mut group = c.benchmark_group("mixed");
    group.throughput(Throughput::Elements(1));

    group.bench_function("80_read_20_write", |b| {
        let mut i = 0u64;
        b.iter(|| {
            if i % 5 == 0 {
                // 20% writes
                let key = format!("new:{}", i);
                store.put("bench", &key, Bytes::from("value"), None).unwrap();
            } else {
                // 80% reads
                let key = format!("key:{}", i % 10_000);
                black_box(store.get("bench", &key).unwrap());
            }
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark space enumeration and key listing
fn bench_scans(c: &mut Criterion) {
    let store = Arc::new(RecordStore::new(MemoryBackend::new()));

    // Pre-populate a few spaces
    for space in ["users", "sessions", "cache"] {
        for i in 0..1_000 {
            let key = format!("{}:{}", space, i);
            store.put(space, &key, Bytes::from("data"), None).unwrap();
        }
    }

    let mut group = c.benchmark_group("scans");

    group.bench_function("list_keys", |b| {
        b.iter(|| {
            black_box(store.list_keys("users").unwrap());
        });
    });

    group.bench_function("count_live_keys", |b| {
        b.iter(|| {
            black_box(store.count_live_keys("users").unwrap());
        });
    });

    group.bench_function("list_spaces", |b| {
        b.iter(|| {
            black_box(store.list_spaces().unwrap());
        });
    });

    group.finish();
}

/// Benchmark concurrent access
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("4_threads_mixed", |b| {
        b.iter(|| {
            let store = Arc::new(RecordStore::new(MemoryBackend::new()));
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || {
                        for i in 0..10_000 {
                            let key = format!("key:{}:{}", t, i);
                            store
                                .put("bench", &key, Bytes::from("value"), None)
                                .unwrap();
                            store.get("bench", &key).unwrap();
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            black_box(store.stats());
        });
    });

    group.finish();
}

/// Benchmark expiration paths
fn bench_expiration(c: &mut Criterion) {
    use spacekv::storage::now_millis;

    let store = Arc::new(RecordStore::new(MemoryBackend::new()));

    let mut group = c.benchmark_group("expiration");
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_with_expiration", |b| {
        let mut i = 0u64;
        let later = now_millis() + 3_600_000;
        b.iter(|| {
            let key = format!("key:{}", i);
            store
                .put("bench", &key, Bytes::from("value"), Some(later))
                .unwrap();
            i += 1;
        });
    });

    group.bench_function("purge_expired_pass", |b| {
        b.iter(|| {
            // Half the records in this batch are born expired
            for i in 0..1_000 {
                let expired_at = if i % 2 == 0 {
                    Some(now_millis() - 1)
                } else {
                    Some(now_millis() + 3_600_000)
                };
                store
                    .put("purge", &format!("key:{}", i), Bytes::from("v"), expired_at)
                    .unwrap();
            }
            black_box(store.purge_expired().unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_put,
    bench_get,
    bench_mixed,
    bench_scans,
    bench_concurrent,
    bench_expiration,
);

criterion_main!(benches);
