//! Criterion micro-benchmarks for neighbourhood resolution.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_bench::reference_structure;
use tessera_core::Coordinate;
use tessera_space::connection::connections;
use tessera_space::neighborhood::{coordinates_of_neighbors, valid_neighbor_coordinates};
use tessera_space::{CellShape, NeighborhoodMode};

/// Resolve wrapped neighbours for all 10K cells of each shape.
fn bench_valid_neighbors_10k(c: &mut Criterion) {
    let mut group = c.benchmark_group("valid_neighbors_10k");
    for shape in CellShape::ALL {
        let structure = reference_structure(shape).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(shape), &structure, |b, structure| {
            b.iter(|| {
                for coordinate in structure.coordinates() {
                    let n = valid_neighbor_coordinates(coordinate, NeighborhoodMode::EdgesAndVertices, structure);
                    black_box(&n);
                }
            });
        });
    }
    group.finish();
}

/// Look up raw connection offsets through the shared cache.
fn bench_connection_lookup(c: &mut Criterion) {
    let coordinates: Vec<Coordinate> = (0..1000).map(|i| Coordinate::new(i % 37, i / 37)).collect();
    c.bench_function("connection_lookup_triangle_1k", |b| {
        b.iter(|| {
            for &coordinate in &coordinates {
                let n = connections(coordinate, NeighborhoodMode::EdgesAndVertices, CellShape::Triangle);
                black_box(n.len());
            }
        });
    });
}

/// Breadth-first expansion out to radius 5.
fn bench_neighbors_within_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors_radius_5");
    for shape in CellShape::ALL {
        group.bench_function(BenchmarkId::from_parameter(shape), |b| {
            b.iter(|| {
                let set = coordinates_of_neighbors(Coordinate::new(50, 50), NeighborhoodMode::EdgesOnly, shape, 5);
                black_box(set)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_valid_neighbors_10k,
    bench_connection_lookup,
    bench_neighbors_within_radius
);
criterion_main!(benches);
