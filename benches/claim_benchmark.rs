//! Benchmark for ownership claims against large partitions.
//!
//! Measures how claim reconciliation and edit remapping scale with the number
//! of tracked intervals.

use authorship::{RangeOwnershipTracker, TextEdit};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const OWNERS: [&str; 3] = ["alice", "bob", "carol"];

/// Build a tracker holding `num_intervals` adjacent 10-byte intervals.
fn populated_tracker(num_intervals: usize) -> RangeOwnershipTracker {
    let mut tracker = RangeOwnershipTracker::new();
    for i in 0..num_intervals {
        let from = i * 10;
        tracker
            .apply_ownership_claim(from, from + 10, OWNERS[i % OWNERS.len()])
            .expect("valid claim");
    }
    tracker
}

fn benchmark_claims(c: &mut Criterion) {
    let mut group = c.benchmark_group("ownership_claim");

    for num_intervals in [10, 100, 1000] {
        let tracker = populated_tracker(num_intervals);
        let middle = num_intervals * 5;

        group.bench_with_input(
            BenchmarkId::new("split_middle", num_intervals),
            &num_intervals,
            |b, _| {
                b.iter_batched(
                    || populated_tracker(num_intervals),
                    |mut tracker| {
                        tracker
                            .apply_ownership_claim(black_box(middle + 3), black_box(middle + 27), "dave")
                            .expect("valid claim");
                        tracker
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("owner_lookup", num_intervals),
            &num_intervals,
            |b, _| b.iter(|| tracker.owner_at(black_box(middle))),
        );
    }

    group.finish();
}

fn benchmark_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_change");

    for num_intervals in [10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("insert_at_start", num_intervals),
            &num_intervals,
            |b, &n| {
                b.iter_batched(
                    || populated_tracker(n),
                    |mut tracker| {
                        tracker.apply_document_change(&TextEdit::insert(0, black_box(4)));
                        tracker
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_claims, benchmark_remap);
criterion_main!(benches);
