//! Sync reconciliation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docstore_bench::{dirty_ids, populated_state};
use docstore_core::AckPolicy;

/// Benchmark capturing the dirty snapshot.
fn bench_begin_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("begin_sync");

    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let state = populated_state(size, 0.5);
            b.iter_batched(
                || state.clone(),
                |mut state| {
                    let (ticket, snapshot) = state.begin_sync();
                    state.fail_sync(ticket, "bench");
                    black_box(snapshot.len())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Benchmark applying a full acknowledgment under each policy.
fn bench_complete_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_sync");

    for (name, policy) in [
        ("require_unchanged", AckPolicy::RequireUnchanged),
        ("trust_acknowledged", AckPolicy::TrustAcknowledged),
    ] {
        for size in [100, 1_000, 10_000] {
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                let state = populated_state(size, 0.5);
                let acks = dirty_ids(&state);
                b.iter_batched(
                    || state.clone(),
                    |mut state| {
                        let (ticket, snapshot) = state.begin_sync();
                        let report = state.complete_sync(ticket, &snapshot, acks.clone(), policy);
                        black_box(report.remaining_dirty)
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_begin_sync, bench_complete_sync);
criterion_main!(benches);
