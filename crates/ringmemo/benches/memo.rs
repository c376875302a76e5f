use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringlist::RingList;
use ringmemo::MemoOptions;

fn bench_repeated_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("repeated_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("same_args_capacity_24", |b| {
        let mut square = MemoOptions::new().build(|x: u64| x * x).unwrap();

        // Fill the store so the hit is not the only entry
        for x in 0..24 {
            square.call(x);
        }

        b.iter(|| {
            black_box(square.call(black_box(23)));
        });
    });

    group.finish();
}

fn bench_scan_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_depth");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for capacity in [8usize, 64, 512] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut ident = MemoOptions::new()
                    .capacity(capacity)
                    .build(|x: usize| x)
                    .unwrap();
                for x in 0..capacity {
                    ident.call(x);
                }

                // Round-robin over the resident set: every lookup is a hit,
                // and the target is always the oldest entry
                let mut counter = 0;
                b.iter(|| {
                    black_box(ident.call(counter % capacity));
                    counter += 1;
                });
            },
        );
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("all_miss_capacity_24", |b| {
        let mut ident = MemoOptions::new().build(|x: u64| x).unwrap();

        let mut counter = 0u64;
        b.iter(|| {
            black_box(ident.call(counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_ring_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("push_shift", |b| {
        let mut ring: RingList<u64> = (0..1024).collect();
        let mut counter = 0u64;
        b.iter(|| {
            ring.push(black_box(counter));
            black_box(ring.shift());
            counter += 1;
        });
    });

    group.bench_function("move_to_back", |b| {
        let ring_len = 1024;
        let mut ring: RingList<u64> = (0..ring_len).collect();
        b.iter(|| {
            if let Some(head) = ring.head() {
                ring.move_to_back(black_box(head));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_repeated_hit,
    bench_scan_depth,
    bench_churn,
    bench_ring_ops
);
criterion_main!(benches);
