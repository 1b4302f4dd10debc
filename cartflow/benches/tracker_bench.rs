//! Benchmarks for operation registration and teardown.

use cartflow::tracker::{Continuation, OperationRegistry};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn registration_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");

    c.bench_function("register_resolved", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let registry = OperationRegistry::default();
                let handle = registry.register(
                    "bench",
                    async { Ok::<_, ()>(black_box(1_u32)) },
                    Continuation::ignore(),
                );
                handle.finished().await;
            });
        });
    });

    c.bench_function("teardown_100_pending", |b| {
        b.iter_batched(
            || {
                let registry = OperationRegistry::default();
                runtime.block_on(async {
                    for _ in 0..100 {
                        registry.register_cancellable(
                            "pending",
                            |token| async move {
                                token.cancelled().await;
                                Ok::<_, ()>(0_u32)
                            },
                            Continuation::ignore(),
                        );
                    }
                });
                registry
            },
            |registry| black_box(registry.teardown()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, registration_benchmark);
criterion_main!(benches);
