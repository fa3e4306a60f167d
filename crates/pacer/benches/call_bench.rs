//! Hot-path cost of calling a limiter

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

fn bench_calls(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();
    let _guard = runtime.enter();

    let throttled = pacer::throttle(|n: u64| { black_box(n); }, Duration::from_secs(60)).unwrap();
    throttled.call(0);
    c.bench_function("throttle_call_in_window", |b| {
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            throttled.call(black_box(n));
        });
    });

    let debounced = pacer::debounce(|n: u64| { black_box(n); }, Duration::from_secs(60)).unwrap();
    c.bench_function("debounce_call", |b| {
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            debounced.call(black_box(n));
        });
    });
}

criterion_group!(benches, bench_calls);
criterion_main!(benches);
