//! # Range Ledger Benchmarks
//!
//! | Operation | Claim |
//! |-----------|-------|
//! | `get_range` | O(log n) in the number of ranges |
//! | `transfer` | O(k log n) in the number of ranges consumed |
//! | `modify_ranges` | O(k log n) in the number of ranges touched |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rl_01_range_ledger::{RangeLedger, RangeLedgerApi};
use rl_tests::fixtures::{account, tag, Harness};
use shared_types::Tag;

/// A ledger with `ranges` alternating-tag ranges of 100 tokens each.
fn fragmented(ranges: u64) -> RangeLedger {
    let mut ledger = RangeLedger::default();
    for i in 0..ranges {
        let _ = ledger.mint(account(1), 100, 0, Tag::new([(i % 2) as u8]));
    }
    ledger
}

fn bench_point_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-01-get-range");
    for ranges in [1_000u64, 10_000, 100_000] {
        let ledger = fragmented(ranges);
        let supply = ledger.total_supply();
        let mut rng = rand::thread_rng();
        group.bench_with_input(BenchmarkId::from_parameter(ranges), &ranges, |b, _| {
            b.iter(|| black_box(ledger.get_range(rng.gen_range(1..=supply))))
        });
    }
    group.finish();
}

fn bench_fragmented_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-01-transfer");
    for consumed in [1u64, 10, 100] {
        group.throughput(Throughput::Elements(consumed));
        group.bench_with_input(BenchmarkId::from_parameter(consumed), &consumed, |b, &k| {
            b.iter_batched(
                || fragmented(1_000),
                |mut ledger| {
                    let plan = ledger.plan_transfer(account(1), account(2), k * 100, 0);
                    if let Ok(plan) = plan {
                        black_box(ledger.apply_transfer(plan));
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_modify_ranges(c: &mut Criterion) {
    c.bench_function("rl-01-modify-ranges-1000", |b| {
        b.iter_batched(
            || fragmented(1_000),
            |mut ledger| black_box(ledger.modify_ranges(50, 99_950, 7, Tag::new([9]))),
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_service_transfer(c: &mut Criterion) {
    let h = Harness::permissive();
    let _ = h.ledger.mint(account(1), u64::MAX / 2, 0, tag("0x00"));
    c.bench_function("rl-01-service-transfer", |b| {
        b.iter(|| black_box(h.ledger.transfer(account(1), account(2), 10)))
    });
}

criterion_group!(
    benches,
    bench_point_query,
    bench_fragmented_transfer,
    bench_modify_ranges,
    bench_service_transfer
);
criterion_main!(benches);
