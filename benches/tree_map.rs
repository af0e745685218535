use assoc::TreeMap;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::time::Instant;

fn put_random(c: &mut Criterion) {
    c.bench_function("TreeMap: put, random", |b| {
        b.iter_custom(|iters| {
            let mut rng = rand::rng();
            let keys: Vec<u64> = (0..iters).map(|_| rng.random_range(0..u64::MAX)).collect();
            let mut treemap: TreeMap<u64, u64> = TreeMap::default();
            let start = Instant::now();
            for k in keys {
                assert!(treemap.put(k, k).is_ok());
            }
            start.elapsed()
        })
    });
}

fn get(c: &mut Criterion) {
    c.bench_function("TreeMap: get", |b| {
        b.iter_custom(|iters| {
            let mut treemap: TreeMap<u64, u64> = TreeMap::default();
            for i in 0..iters {
                assert!(treemap.put(i, i).is_ok());
            }
            let start = Instant::now();
            for i in 0..iters {
                assert_eq!(treemap.get(&i), Some(&i));
            }
            start.elapsed()
        })
    });
}

fn range_scan(c: &mut Criterion) {
    let treemap: TreeMap<u64, u64> = (0..65536).map(|k| (k, k)).collect();
    c.bench_function("TreeMap: range scan", |b| {
        b.iter(|| {
            let sum: u64 = treemap.range(1024..2048).iter().map(|(_, v)| *v).sum();
            assert_eq!(sum, (1024..2048).sum::<u64>());
        })
    });
}

criterion_group!(tree_map, put_random, get, range_scan);
criterion_main!(tree_map);
