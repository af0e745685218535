use assoc::HashMap;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Every key hashes to the same value.
#[derive(Eq, PartialEq)]
struct Colliding(u64);

impl Hash for Colliding {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        0_u64.hash(state);
    }
}

fn put_cold(c: &mut Criterion) {
    c.bench_function("HashMap: put, cold", |b| {
        b.iter_custom(|iters| {
            let mut hashmap: HashMap<u64, u64> = HashMap::default();
            let start = Instant::now();
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            start.elapsed()
        })
    });
}

fn put_warmed_up(c: &mut Criterion) {
    c.bench_function("HashMap: put, warmed up", |b| {
        b.iter_custom(|iters| {
            let mut hashmap: HashMap<u64, u64> = HashMap::with_capacity(iters as usize * 2);
            let start = Instant::now();
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            start.elapsed()
        })
    });
}

fn get(c: &mut Criterion) {
    c.bench_function("HashMap: get", |b| {
        b.iter_custom(|iters| {
            let mut hashmap: HashMap<u64, u64> = HashMap::with_capacity(iters as usize * 2);
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            let start = Instant::now();
            for i in 0..iters {
                assert_eq!(hashmap.get(&i), Some(&i));
            }
            start.elapsed()
        })
    });
}

fn get_colliding(c: &mut Criterion) {
    c.bench_function("HashMap: get, colliding", |b| {
        b.iter_custom(|iters| {
            let mut hashmap: HashMap<Colliding, u64> = HashMap::with_capacity(64);
            for i in 0..1024 {
                assert!(hashmap.put(Colliding(i), i).is_none());
            }
            let start = Instant::now();
            for i in 0..iters {
                let key = i % 1024;
                assert_eq!(hashmap.get(&Colliding(key)), Some(&key));
            }
            start.elapsed()
        })
    });
}

fn put_tail_latency(c: &mut Criterion) {
    c.bench_function("HashMap: put_tail_latency", move |b| {
        b.iter_custom(|iters| {
            let mut duration = Duration::default();
            for _ in 0..iters {
                let mut hashmap: HashMap<u64, u64> = HashMap::default();
                let mut key = 0;
                let mut max_duration = Duration::default();
                (0..1048576).for_each(|_| {
                    key += 1;
                    let start = Instant::now();
                    assert!(hashmap.put(key, key).is_none());
                    let elapsed = start.elapsed();
                    if elapsed > max_duration {
                        max_duration = elapsed;
                    }
                });
                duration += max_duration;
            }
            duration
        })
    });
}

criterion_group!(
    hash_map,
    put_cold,
    put_tail_latency,
    put_warmed_up,
    get,
    get_colliding
);
criterion_main!(hash_map);
