//! Exhaustive per-shape checks of the connection cache keys.
//!
//! A wrong key silently hands one coordinate the neighbour geometry of
//! another parity class. These tests sweep whole grids and compare every
//! pair, so a mis-keyed entry shows up as an asymmetric relation or as two
//! parity classes sharing offsets they should not share.

use proptest::prelude::*;
use tessera_core::{Coordinate, Offset};
use tessera_space::connection::{connections, ConnectionKey, ConnectionTable};
use tessera_space::neighborhood::{is_cell_neighbor, valid_neighbor_coordinates};
use tessera_space::{CellShape, GridEdgeBehavior, GridStructure, NeighborhoodMode, Parity};

fn offsets(c: Coordinate, mode: NeighborhoodMode, shape: CellShape) -> Vec<Offset> {
    connections(c, mode, shape).iter().map(|n| n.offset).collect()
}

#[test]
fn symmetric_and_irreflexive_over_whole_grids() {
    for shape in CellShape::ALL {
        for mode in NeighborhoodMode::ALL {
            let cells: Vec<Coordinate> = (-2..10)
                .flat_map(|y| (-2..10).map(move |x| Coordinate::new(x, y)))
                .collect();
            for &a in &cells {
                assert!(!is_cell_neighbor(a, a, mode, shape));
                for &b in &cells {
                    assert_eq!(
                        is_cell_neighbor(a, b, mode, shape),
                        is_cell_neighbor(b, a, mode, shape),
                        "{shape} {mode}: {a} / {b}"
                    );
                }
            }
        }
    }
}

#[test]
fn coordinates_sharing_a_key_share_geometry() {
    for shape in CellShape::ALL {
        for mode in NeighborhoodMode::ALL {
            for y in 0..8 {
                for x in 0..8 {
                    let a = Coordinate::new(x, y);
                    for (dx, dy) in [(2, 0), (0, 2), (2, 2), (4, 6)] {
                        let b = Coordinate::new(x + dx, y + dy);
                        assert_eq!(
                            ConnectionKey::for_coordinate(a, mode, shape),
                            ConnectionKey::for_coordinate(b, mode, shape)
                        );
                        assert_eq!(offsets(a, mode, shape), offsets(b, mode, shape));
                    }
                }
            }
        }
    }
}

#[test]
fn parity_classes_have_distinct_geometry() {
    for mode in NeighborhoodMode::ALL {
        // Triangles: up and down differ in both modes.
        let down = Coordinate::new(0, 0);
        let up = Coordinate::new(1, 0);
        assert_eq!(CellShape::Triangle.parity(down), Parity::PointingDown);
        assert_eq!(CellShape::Triangle.parity(up), Parity::PointingUp);
        assert_ne!(offsets(down, mode, CellShape::Triangle), offsets(up, mode, CellShape::Triangle));

        // Hexagons: even and odd columns differ.
        assert_ne!(
            offsets(Coordinate::new(0, 0), mode, CellShape::Hexagon),
            offsets(Coordinate::new(1, 0), mode, CellShape::Hexagon)
        );

        // Squares: identical everywhere.
        assert_eq!(
            offsets(Coordinate::new(0, 0), mode, CellShape::Square),
            offsets(Coordinate::new(1, 3), mode, CellShape::Square)
        );
    }
}

#[test]
fn modes_differ_only_where_geometry_does() {
    let c = Coordinate::new(3, 3);
    assert_ne!(
        offsets(c, NeighborhoodMode::EdgesOnly, CellShape::Square),
        offsets(c, NeighborhoodMode::EdgesAndVertices, CellShape::Square)
    );
    assert_ne!(
        offsets(c, NeighborhoodMode::EdgesOnly, CellShape::Triangle),
        offsets(c, NeighborhoodMode::EdgesAndVertices, CellShape::Triangle)
    );
    assert_eq!(
        offsets(c, NeighborhoodMode::EdgesOnly, CellShape::Hexagon),
        offsets(c, NeighborhoodMode::EdgesAndVertices, CellShape::Hexagon)
    );
}

#[test]
fn private_table_matches_shared_table() {
    let local = ConnectionTable::new();
    for key in ConnectionKey::ALL {
        assert_eq!(local.get(key), ConnectionTable::shared().get(key));
    }
}

#[test]
fn torus_seams_preserve_symmetry() {
    // With valid wrap multiples, mapped neighbourhoods stay symmetric
    // across the seam.
    for (shape, w, h) in [
        (CellShape::Square, 9, 11),
        (CellShape::Hexagon, 10, 9),
        (CellShape::Triangle, 10, 12),
    ] {
        let s = GridStructure::from_parts(shape, GridEdgeBehavior::WRAP_XY, w, h).unwrap();
        for mode in NeighborhoodMode::ALL {
            for a in s.coordinates() {
                for b in valid_neighbor_coordinates(a, mode, &s) {
                    assert!(
                        valid_neighbor_coordinates(b, mode, &s).contains(&a),
                        "{shape} {mode}: {b} in N({a}) but not vice versa"
                    );
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn sampled_pairs_are_symmetric(
        ax in -50i32..50, ay in -50i32..50,
        dx in -3i32..=3, dy in -3i32..=3,
        shape in 0usize..3, vertex_mode in any::<bool>(),
    ) {
        let shape = CellShape::ALL[shape];
        let mode = if vertex_mode { NeighborhoodMode::EdgesAndVertices } else { NeighborhoodMode::EdgesOnly };
        let a = Coordinate::new(ax, ay);
        let b = Coordinate::new(ax + dx, ay + dy);
        prop_assert_eq!(is_cell_neighbor(a, b, mode, shape), is_cell_neighbor(b, a, mode, shape));
        if a == b {
            prop_assert!(!is_cell_neighbor(a, b, mode, shape));
        }
    }
}
