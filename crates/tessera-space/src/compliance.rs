//! Structure compliance test helpers.
//!
//! These functions verify that a [`GridStructure`] and the neighbour
//! engine satisfy the invariants every simulation relies on. Reused
//! across the structure, neighbourhood and integration tests.

use indexmap::IndexSet;
use tessera_core::Coordinate;

use crate::connection::NeighborhoodMode;
use crate::neighborhood::{cell_neighbors, cell_neighbors_with_edge_behavior, is_cell_neighbor};
use crate::structure::GridStructure;

/// Assert that `coordinates()` yields exactly `cell_count` unique, valid
/// coordinates in row-major order.
pub fn assert_coordinates_complete(structure: &GridStructure) {
    let coords: Vec<Coordinate> = structure.coordinates().collect();
    assert_eq!(coords.len(), structure.cell_count(), "coordinate count mismatch");
    let unique: IndexSet<Coordinate> = coords.iter().copied().collect();
    assert_eq!(unique.len(), coords.len(), "duplicate coordinates");
    for pair in coords.windows(2) {
        assert!(
            (pair[0].y, pair[0].x) < (pair[1].y, pair[1].x),
            "not row-major: {} before {}",
            pair[0],
            pair[1]
        );
    }
    assert!(coords.iter().all(|&c| structure.is_coordinate_valid(c)));
}

/// Assert that `b` is a neighbour of `a` iff `a` is a neighbour of `b`,
/// and that no cell neighbours itself.
pub fn assert_neighbours_symmetric(structure: &GridStructure, mode: NeighborhoodMode) {
    let shape = structure.cell_shape();
    for a in structure.coordinates() {
        assert!(!is_cell_neighbor(a, a, mode, shape), "{a} neighbours itself");
        for n in cell_neighbors(a, mode, shape) {
            assert!(
                is_cell_neighbor(n.neighbor, a, mode, shape),
                "symmetry violated: {} in N({a}) but {a} not in N({})",
                n.neighbor,
                n.neighbor
            );
        }
    }
}

/// Assert that every resolvable neighbour maps into the grid and every
/// unresolvable one keeps its original coordinate.
pub fn assert_mapped_neighbours_valid(structure: &GridStructure, mode: NeighborhoodMode) {
    for a in structure.coordinates() {
        for (mapped, group) in cell_neighbors_with_edge_behavior(a, mode, structure) {
            for n in group {
                assert_eq!(n.mapped, mapped);
                if n.is_resolvable() {
                    assert!(structure.is_coordinate_valid(mapped), "{a} -> {mapped} out of grid");
                } else {
                    assert_eq!(n.mapped, n.neighbor);
                }
            }
        }
    }
}

/// Run all compliance checks for both neighbourhood modes.
pub fn run_full_compliance(structure: &GridStructure) {
    assert_coordinates_complete(structure);
    for mode in NeighborhoodMode::ALL {
        assert_neighbours_symmetric(structure, mode);
        assert_mapped_neighbours_valid(structure, mode);
    }
}
