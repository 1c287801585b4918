use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use graftcrm_commissions::{allocate_commissions, AssignmentDraft, COMMISSION_POOL_RATE_BPS};
use graftcrm_core::AggregateId;
use graftcrm_reps::RepresentativeId;

fn drafts(n: usize) -> Vec<AssignmentDraft> {
    (0..n)
        .map(|i| AssignmentDraft {
            representative_id: RepresentativeId::new(AggregateId::new()),
            commission_rate_bps: 500 + (i as u32 % 10) * 100,
        })
        .collect()
}

fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_commissions");

    for rep_count in [1usize, 2, 8, 32] {
        let input = drafts(rep_count);
        group.throughput(Throughput::Elements(rep_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(rep_count),
            &input,
            |b, input| {
                b.iter(|| {
                    allocate_commissions(
                        black_box(714_264),
                        black_box(input),
                        COMMISSION_POOL_RATE_BPS,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_allocation);
criterion_main!(benches);
