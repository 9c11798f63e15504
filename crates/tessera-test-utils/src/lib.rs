//! Test entities and fixtures for Tessera development.
//!
//! Provides [`TestEntity`], a small three-state entity for model and
//! runner tests, structure builders covering every shape/edge pairing,
//! and seeded generators so tests stay reproducible.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_core::GridEntity;
use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};

pub use fixtures::{agents_at, scattered_agents};

/// Entity with an empty default, numbered agents and immovable walls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TestEntity {
    #[default]
    Empty,
    Agent(u32),
    Wall,
}

impl TestEntity {
    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent(_))
    }
}

impl GridEntity for TestEntity {
    fn descriptor_id(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Agent(_) => "agent",
            Self::Wall => "wall",
        }
    }
}

/// Square grid with the given edges.
///
/// # Panics
///
/// If the size is rejected.
pub fn square(width: i32, height: i32, edges: GridEdgeBehavior) -> GridStructure {
    structure(CellShape::Square, edges, width, height)
}

/// Any grid.
///
/// # Panics
///
/// If the size is rejected.
pub fn structure(shape: CellShape, edges: GridEdgeBehavior, width: i32, height: i32) -> GridStructure {
    GridStructure::from_parts(shape, edges, width, height)
        .unwrap_or_else(|e| panic!("test structure {shape} {width}x{height}: {e}"))
}

/// One structure for every shape and edge preset, sized to satisfy every
/// wrap multiple (width 12, height 8).
pub fn every_structure() -> Vec<GridStructure> {
    CellShape::ALL
        .into_iter()
        .flat_map(|shape| {
            GridEdgeBehavior::PRESETS
                .into_iter()
                .map(move |edges| structure(shape, edges, 12, 8))
        })
        .collect()
}

/// Deterministic generator for tests.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_structure_is_complete() {
        let all = every_structure();
        assert_eq!(all.len(), CellShape::ALL.len() * GridEdgeBehavior::PRESETS.len());
        assert!(all.iter().all(|s| s.cell_count() == 96));
    }

    #[test]
    fn descriptors_ignore_agent_number() {
        assert_eq!(TestEntity::Agent(1).descriptor_id(), TestEntity::Agent(9).descriptor_id());
        assert_ne!(TestEntity::Wall.descriptor_id(), TestEntity::Empty.descriptor_id());
    }
}
