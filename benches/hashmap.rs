use bucketmap_rs::{BuildOneAtATime, HashMap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::collections::HashMap as StdHashMap;

fn generate_test_data(size: usize) -> Vec<(u64, u64)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size).map(|_| (rng.gen(), rng.gen())).collect()
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in [1_000usize, 10_000, 100_000] {
        let test_data = generate_test_data(size);

        group.bench_with_input(BenchmarkId::new("bucketmap", size), &test_data, |b, data| {
            b.iter(|| {
                let mut map = HashMap::new();
                for (k, v) in data {
                    black_box(map.insert(*k, *v).unwrap());
                }
                map
            })
        });

        group.bench_with_input(BenchmarkId::new("bucketmap_oaat", size), &test_data, |b, data| {
            b.iter(|| {
                let mut map: HashMap<u64, u64, BuildOneAtATime> = HashMap::default();
                for (k, v) in data {
                    black_box(map.insert(*k, *v).unwrap());
                }
                map
            })
        });

        group.bench_with_input(BenchmarkId::new("std_hashmap", size), &test_data, |b, data| {
            b.iter(|| {
                let mut map = StdHashMap::new();
                for (k, v) in data {
                    black_box(map.insert(*k, *v));
                }
                map
            })
        });
    }
    group.finish();
}

fn benchmark_read(c: &mut Criterion) {
    let test_data = generate_test_data(10_000);

    let mut map = HashMap::new();
    let mut std_map = StdHashMap::new();
    for (k, v) in &test_data {
        map.insert(*k, *v).unwrap();
        std_map.insert(*k, *v);
    }

    c.bench_function("bucketmap_read", |b| {
        b.iter(|| {
            for (k, _) in &test_data {
                black_box(map.get(k));
            }
        })
    });

    c.bench_function("std_hashmap_read", |b| {
        b.iter(|| {
            for (k, _) in &test_data {
                black_box(std_map.get(k));
            }
        })
    });

    c.bench_function("bucketmap_read_miss", |b| {
        b.iter(|| {
            for (k, _) in &test_data {
                black_box(map.get(&k.wrapping_add(1)));
            }
        })
    });
}

fn benchmark_mixed(c: &mut Criterion) {
    let test_data = generate_test_data(10_000);

    c.bench_function("bucketmap_insert_remove", |b| {
        b.iter(|| {
            let mut map = HashMap::with_capacity(1024).unwrap();
            for (i, (k, v)) in test_data.iter().enumerate() {
                map.insert(*k, *v).unwrap();
                if i % 3 == 0 {
                    black_box(map.remove(k));
                }
            }
            map
        })
    });

    c.bench_function("std_hashmap_insert_remove", |b| {
        b.iter(|| {
            let mut map = StdHashMap::with_capacity(1024);
            for (i, (k, v)) in test_data.iter().enumerate() {
                map.insert(*k, *v);
                if i % 3 == 0 {
                    black_box(map.remove(k));
                }
            }
            map
        })
    });

    let mut map = HashMap::new();
    for (k, v) in &test_data {
        map.insert(*k, *v).unwrap();
    }
    c.bench_function("bucketmap_iterate", |b| {
        b.iter(|| black_box(map.values().fold(0u64, |acc, v| acc.wrapping_add(*v))))
    });
}

criterion_group!(benches, benchmark_insert, benchmark_read, benchmark_mixed);
criterion_main!(benches);
