use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use counterplus::{CounterConfig, CounterState, Signal};
use tokio::runtime::Builder;

fn signal_read_benchmark(c: &mut Criterion) {
    let signal: Signal<i64> = Signal::new(42);

    c.bench_function("signal_read", |b| {
        b.iter(|| {
            black_box(signal.get());
        });
    });
}

fn signal_write_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_write");

    for subscriber_count in [0, 1, 10, 100].iter() {
        let signal: Signal<i64> = Signal::new(0);
        let guards: Vec<_> = (0..*subscriber_count)
            .map(|_| {
                signal.watch(|value| {
                    black_box(value);
                })
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    signal.set(black_box(i));
                    i += 1;
                });
            },
        );
        drop(guards);
    }
    group.finish();
}

fn counter_operations_benchmark(c: &mut Criterion) {
    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime");
    let state = CounterState::new(CounterConfig::default(), runtime.handle().clone())
        .expect("default config is valid");

    c.bench_function("counter_increment", |b| {
        b.iter(|| state.increment());
    });

    c.bench_function("counter_interval_cycle", |b| {
        b.iter(|| {
            state.increase_interval();
            state.decrease_interval();
        });
    });

    c.bench_function("counter_snapshot", |b| {
        b.iter(|| black_box(state.snapshot()));
    });
}

criterion_group!(
    benches,
    signal_read_benchmark,
    signal_write_benchmark,
    counter_operations_benchmark,
);
criterion_main!(benches);
