//! Benchmarks for the clustering engine and the clustering codec.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qt_miner::mining::{MinerConfig, QtMiner, Radius};
use qt_miner::repository::{ClusterStore, InMemoryStorage};
use qt_miner::test_fixtures::{grouped, random_mixed};
use tokio::runtime::Runtime;

fn benchmark_compute_grouped(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_grouped");
    let miner = QtMiner::new(MinerConfig::default());
    let radius = Radius::new(0.1).unwrap();

    for records in [30, 90, 180] {
        let data = grouped(3, records / 3, 42).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(records), &data, |b, data| {
            b.iter(|| {
                let outcome = miner.compute(data, radius).unwrap();
                std::hint::black_box(outcome);
            });
        });
    }

    group.finish();
}

fn benchmark_compute_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_mixed");
    let miner = QtMiner::new(MinerConfig::default());

    // Small radii split mixed data into many clusters, the costliest case
    for radius in [0.0, 0.25, 0.75] {
        let data = random_mixed(100, 7).unwrap();
        let radius = Radius::new(radius).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(radius), &data, |b, data| {
            b.iter(|| std::hint::black_box(miner.compute(data, radius)));
        });
    }

    group.finish();
}

fn benchmark_save_load(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let data = random_mixed(200, 3).unwrap();
    let clusters = QtMiner::default()
        .compute(&data, Radius::new(0.25).unwrap())
        .unwrap()
        .clusters;
    let store = ClusterStore::new(InMemoryStorage::new());

    c.bench_function("save_load_round_trip", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.save(&clusters, "bench").await.unwrap();
                let loaded = store.load("bench").await.unwrap();
                std::hint::black_box(loaded);
            })
        });
    });
}

criterion_group!(
    benches,
    benchmark_compute_grouped,
    benchmark_compute_mixed,
    benchmark_save_load
);
criterion_main!(benches);
