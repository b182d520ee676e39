//! Criterion benchmarks for task hand-off through the single-worker executor.
//!
//! Run with:
//!   cargo bench --bench executor

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use taskbench::display::set_display_level;
use taskbench::{from_fn, Abort, CancelToken, PrimeChecker, SingleThreadExecutor};

fn bench_submit_get(c: &mut Criterion) {
    set_display_level(0);
    let exec = SingleThreadExecutor::new().expect("executor");
    let mut group = c.benchmark_group("executor");

    group.bench_function("submit_get_noop", |b| {
        b.iter(|| {
            exec.submit(from_fn(|_: &CancelToken| Ok::<_, Abort>(())))
                .unwrap()
                .get()
                .unwrap()
        })
    });

    // Cost of cancellation checkpoints at different check intervals.
    for &interval in &[64u64, 1024, 16_384] {
        group.bench_with_input(BenchmarkId::new("prime_check_interval", interval), &interval, |b, &interval| {
            b.iter(|| {
                exec.submit(PrimeChecker::smart(1_000_000_007).with_check_interval(interval))
                    .unwrap()
                    .get()
                    .unwrap()
            })
        });
    }

    group.throughput(Throughput::Elements(100));
    group.bench_function("submit_100_then_wait_idle", |b| {
        b.iter(|| {
            for _ in 0..100 {
                exec.submit(from_fn(|_: &CancelToken| Ok::<_, Abort>(()))).unwrap();
            }
            exec.wait_idle();
        })
    });

    group.bench_function("cancel_running_sleep", |b| {
        b.iter(|| {
            let handle = exec.submit(taskbench::SleepTask::new(Duration::from_secs(10))).unwrap();
            handle.cancel(true);
            exec.wait_idle();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_submit_get);
criterion_main!(benches);
