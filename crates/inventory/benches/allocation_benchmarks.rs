use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use stockroute_core::{LocationId, ProductId, SupplierId};
use stockroute_inventory::{Category, Location, Network, Product};

fn network_with(locations_per_category: u32) -> Network {
    let mut network = Network::new();
    let mut next = 1u32;
    for category in Category::ALL {
        for _ in 0..locations_per_category {
            let id = LocationId::new(next).unwrap();
            network
                .register_location(Location::new(id, category, 1_000_000.0, format!("{next} Bench St")).unwrap())
                .unwrap();
            next += 1;
        }
    }
    network
}

fn batch(start: u32, size: u32, mixed: bool) -> Vec<Product> {
    (0..size)
        .map(|i| {
            let days = if mixed && i % 2 == 0 { 10 } else { 90 };
            Product::new(
                ProductId::new(start + i).unwrap(),
                SupplierId::new(1).unwrap(),
                format!("bench-{i}"),
                1.0,
                1.0,
                days,
            )
            .unwrap()
        })
        .collect()
}

fn bench_submit_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_batch");
    for locations in [1u32, 10, 100] {
        group.throughput(Throughput::Elements(10));
        group.bench_with_input(BenchmarkId::from_parameter(locations), &locations, |b, &n| {
            let mut network = network_with(n);
            let mut next_id = 1u32;
            b.iter(|| {
                let outcome = network.submit_batch(batch(next_id, 10, false)).unwrap();
                next_id += 10;
                black_box(outcome)
            });
        });
    }
    group.finish();
}

fn bench_redistribution(c: &mut Criterion) {
    c.bench_function("redistribute_1000_items", |b| {
        b.iter_batched(
            || {
                let mut network = network_with(4);
                for chunk in 0..100 {
                    network.submit_batch(batch(chunk * 10 + 1, 10, true)).unwrap();
                }
                network
            },
            |mut network| black_box(network.run_redistribution(None).unwrap()),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_analysis(c: &mut Criterion) {
    let mut network = network_with(4);
    for chunk in 0..100 {
        network.submit_batch(batch(chunk * 10 + 1, 10, true)).unwrap();
    }
    c.bench_function("analyze_1000_items", |b| b.iter(|| black_box(network.analyze())));
}

criterion_group!(benches, bench_submit_batch, bench_redistribution, bench_analysis);
criterion_main!(benches);
