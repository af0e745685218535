use assoc::StripedMap;
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

fn put_cold(c: &mut Criterion) {
    c.bench_function("StripedMap: put, cold", |b| {
        b.iter_custom(|iters| {
            let stripedmap: StripedMap<u64, u64> = StripedMap::default();
            let start = Instant::now();
            for i in 0..iters {
                assert!(stripedmap.put_if_absent(i, i).is_ok());
            }
            start.elapsed()
        })
    });
}

fn read(c: &mut Criterion) {
    c.bench_function("StripedMap: read", |b| {
        b.iter_custom(|iters| {
            let stripedmap: StripedMap<u64, u64> = StripedMap::with_capacity(iters as usize * 2);
            for i in 0..iters {
                assert!(stripedmap.put_if_absent(i, i).is_ok());
            }
            let start = Instant::now();
            for i in 0..iters {
                assert_eq!(stripedmap.read(&i, |_, v| *v == i), Some(true));
            }
            start.elapsed()
        })
    });
}

fn put_contended(c: &mut Criterion) {
    let num_threads = thread::available_parallelism().map_or(4, |n| n.get().min(8));
    c.bench_function("StripedMap: put, contended", move |b| {
        b.iter_custom(|iters| {
            let stripedmap: Arc<StripedMap<u64, u64>> = Arc::new(StripedMap::default());
            let barrier = Arc::new(Barrier::new(num_threads));
            let handles: Vec<_> = (0..num_threads as u64)
                .map(|t| {
                    let stripedmap = stripedmap.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        let start = Instant::now();
                        for i in 0..iters {
                            assert!(stripedmap.put_if_absent(i * 64 + t, i).is_ok());
                        }
                        start.elapsed()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_default())
                .max()
                .unwrap_or(Duration::default())
        })
    });
}

criterion_group!(striped_map, put_cold, read, put_contended);
criterion_main!(striped_map);
