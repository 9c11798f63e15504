//! Criterion benchmarks for whole simulation steps.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tessera_bench::{conway_profile, stress_profile, sugar_profile, wator_profile};
use tessera_engine::SimulationManager;
use tessera_grid::StorageKind;
use tessera_space::CellShape;

const STEPS: u64 = 10;

/// Ten synchronous Conway generations on 10K cells, per storage kind.
fn bench_conway_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("conway_10_steps");
    for storage in [StorageKind::Dense, StorageKind::Sparse] {
        let config = conway_profile(CellShape::Square, storage, 42);
        group.bench_function(BenchmarkId::from_parameter(format!("{storage:?}")), |b| {
            b.iter_batched(
                || config.build().unwrap(),
                |mut sim| {
                    let result = sim.execute_steps(STEPS, &mut |_| {}).unwrap();
                    black_box(result)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Ten asynchronous Wa-Tor steps on 10K cells, per shape.
fn bench_wator_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("wator_10_steps");
    for shape in CellShape::ALL {
        let config = wator_profile(shape, StorageKind::Dense, 42);
        group.bench_function(BenchmarkId::from_parameter(shape), |b| {
            b.iter_batched(
                || config.build().unwrap(),
                |mut sim| {
                    let result = sim.execute_steps(STEPS, &mut |_| {}).unwrap();
                    black_box(result)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Ten Sugarscape steps on 10K cells, per storage kind.
fn bench_sugar_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("sugar_10_steps");
    for storage in [StorageKind::Dense, StorageKind::Sparse] {
        let config = sugar_profile(storage, 42);
        group.bench_function(BenchmarkId::from_parameter(format!("{storage:?}")), |b| {
            b.iter_batched(
                || config.build().unwrap(),
                |mut sim| {
                    let result = sim.execute_steps(STEPS, &mut |_| {}).unwrap();
                    black_box(result)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// One Conway generation on ~100K cells.
fn bench_conway_stress(c: &mut Criterion) {
    let config = stress_profile(42);
    c.bench_function("conway_stress_1_step", |b| {
        b.iter_batched(
            || config.build().unwrap(),
            |mut sim| black_box(sim.execute_step().unwrap()),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_conway_steps,
    bench_wator_steps,
    bench_sugar_steps,
    bench_conway_stress
);
criterion_main!(benches);
