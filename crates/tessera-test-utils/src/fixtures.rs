//! Pre-populated models.

use rand::Rng;
use tessera_core::Coordinate;
use tessera_grid::{DenseGridModel, ReadableGridModel, SparseGridModel, WritableGridModel};
use tessera_space::GridStructure;

use crate::{seeded_rng, TestEntity};

/// Dense model with `Agent(i)` at the `i`-th coordinate.
///
/// # Panics
///
/// If a coordinate lies outside `structure`.
pub fn agents_at(structure: GridStructure, coordinates: &[Coordinate]) -> DenseGridModel<TestEntity> {
    let mut model = DenseGridModel::new(structure, TestEntity::Empty);
    for (i, &c) in coordinates.iter().enumerate() {
        model.set_entity(c, TestEntity::Agent(i as u32));
    }
    model
}

/// Sparse model with up to `count` agents scattered by `seed`, numbered
/// in placement order.
pub fn scattered_agents(structure: GridStructure, count: usize, seed: u64) -> SparseGridModel<TestEntity> {
    let mut rng = seeded_rng(seed);
    let mut model = SparseGridModel::new(structure, TestEntity::Empty);
    let size = structure.size();
    let mut next = 0u32;
    for _ in 0..count.saturating_mul(20) {
        if model.non_default_count() == count {
            break;
        }
        let c = Coordinate::new(rng.random_range(0..size.width()), rng.random_range(0..size.height()));
        if model.is_default_entity(c) {
            model.set_entity(c, TestEntity::Agent(next));
            next += 1;
        }
    }
    model
}
