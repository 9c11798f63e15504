//! Neighbour resolution: connection templates applied to coordinates and
//! mapped through a structure's edge policy.
//!
//! All lookups go through the shared [`ConnectionTable`]; nothing here
//! allocates on the heap for neighbourhoods of radius 1.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tessera_core::Coordinate;

use crate::compass::CompassDirection;
use crate::connection::{
    connections, CellConnectionType, CellNeighborConnection, ConnectionKey, ConnectionTable,
    NeighborhoodMode,
};
use crate::edge::{EdgeBehaviorAction, EdgeBehaviorResult};
use crate::error::GridError;
use crate::shape::CellShape;
use crate::structure::GridStructure;

/// Largest radius accepted by the radius-based queries.
pub const MAX_RADIUS: i32 = 100;

/// A neighbour of `start`, ignoring grid bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellNeighbor {
    /// The reference cell.
    pub start: Coordinate,
    /// Direction from `start`.
    pub direction: CompassDirection,
    /// Edge or vertex contact.
    pub connection_type: CellConnectionType,
    /// The neighbouring coordinate (possibly outside any grid).
    pub neighbor: Coordinate,
}

/// A neighbour of `start` after edge resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellNeighborWithEdgeBehavior {
    /// The reference cell.
    pub start: Coordinate,
    /// Direction from `start`.
    pub direction: CompassDirection,
    /// Edge or vertex contact.
    pub connection_type: CellConnectionType,
    /// The geometric neighbour before resolution.
    pub neighbor: Coordinate,
    /// Where the neighbour resolves to.
    pub mapped: Coordinate,
    /// What resolution did.
    pub action: EdgeBehaviorAction,
}

impl CellNeighborWithEdgeBehavior {
    fn resolve(start: Coordinate, connection: &CellNeighborConnection, structure: &GridStructure) -> Self {
        let neighbor = start.offset(connection.offset);
        let result = structure.apply_edge_behavior(neighbor);
        Self {
            start,
            direction: connection.direction,
            connection_type: connection.connection_type,
            neighbor,
            mapped: result.mapped,
            action: result.action,
        }
    }

    /// Whether `mapped` is addressable.
    pub const fn is_resolvable(&self) -> bool {
        self.action.is_resolvable()
    }

    /// The edge-resolution part of this neighbour.
    pub const fn edge_result(&self) -> EdgeBehaviorResult {
        EdgeBehaviorResult {
            original: self.neighbor,
            mapped: self.mapped,
            action: self.action,
        }
    }
}

/// Neighbours sharing one mapped coordinate.
///
/// On small wrapped grids two directions can land on the same cell.
pub type NeighborGroup = SmallVec<[CellNeighborWithEdgeBehavior; 2]>;

/// Largest number of radius-1 neighbours any cell of `shape` has in `mode`.
///
/// Read from the connection table: Square 4/8, Hexagon 6/6, Triangle 3/12.
pub fn max_neighbor_count(shape: CellShape, mode: NeighborhoodMode) -> usize {
    let table = ConnectionTable::shared();
    shape
        .parities()
        .iter()
        .map(|&parity| table.get(ConnectionKey::new(shape, mode, parity)).len())
        .max()
        .unwrap_or(0)
}

/// Upper bound on the number of cells within `radius` steps.
///
/// Radius 1 gives the plain neighbour count. Larger radii count the whole
/// disc including its centre, `1 + degree * r * (r + 1) / 2`, which for
/// hexagons is the familiar `1 + 3r(r + 1)`. Non-positive radii give 0.
///
/// # Errors
///
/// [`GridError::RadiusOutOfRange`] above [`MAX_RADIUS`].
pub fn max_neighbor_count_within_radius(
    shape: CellShape,
    mode: NeighborhoodMode,
    radius: i32,
) -> Result<usize, GridError> {
    if radius > MAX_RADIUS {
        return Err(GridError::RadiusOutOfRange {
            radius,
            max: MAX_RADIUS,
        });
    }
    let degree = max_neighbor_count(shape, mode);
    Ok(match radius {
        r if r <= 0 => 0,
        1 => degree,
        r => {
            let r = r as usize;
            1 + degree * r * (r + 1) / 2
        }
    })
}

/// Whether `b` is a radius-1 neighbour of `a`. Symmetric; false for `a == b`.
pub fn is_cell_neighbor(a: Coordinate, b: Coordinate, mode: NeighborhoodMode, shape: CellShape) -> bool {
    a != b
        && connections(a, mode, shape)
            .iter()
            .any(|c| a.offset(c.offset) == b)
}

/// Geometric neighbours of `start`, clockwise from north, ignoring bounds.
pub fn cell_neighbors(
    start: Coordinate,
    mode: NeighborhoodMode,
    shape: CellShape,
) -> impl Iterator<Item = CellNeighbor> {
    connections(start, mode, shape).iter().map(move |c| CellNeighbor {
        start,
        direction: c.direction,
        connection_type: c.connection_type,
        neighbor: start.offset(c.offset),
    })
}

/// Directions available at `start`, clockwise. This is the ring to use
/// with [`CompassDirection::distance_on_ring`].
pub fn cell_neighbor_directions(
    start: Coordinate,
    mode: NeighborhoodMode,
    shape: CellShape,
) -> SmallVec<[CompassDirection; 12]> {
    connections(start, mode, shape)
        .iter()
        .map(|c| c.direction)
        .collect()
}

/// Every neighbour of `start` resolved against `structure`, one per
/// connection, clockwise from north.
pub fn neighbors_with_edge_behavior<'a>(
    start: Coordinate,
    mode: NeighborhoodMode,
    structure: &'a GridStructure,
) -> impl Iterator<Item = CellNeighborWithEdgeBehavior> + 'a {
    connections(start, mode, structure.cell_shape())
        .iter()
        .map(move |c| CellNeighborWithEdgeBehavior::resolve(start, c, structure))
}

/// Neighbours of `start` grouped by mapped coordinate.
///
/// Blocked and absorbed neighbours keep their original coordinate as the
/// key. Empty when `start` is outside the grid.
pub fn cell_neighbors_with_edge_behavior(
    start: Coordinate,
    mode: NeighborhoodMode,
    structure: &GridStructure,
) -> IndexMap<Coordinate, NeighborGroup> {
    let mut grouped: IndexMap<Coordinate, NeighborGroup> = IndexMap::new();
    if !structure.is_coordinate_valid(start) {
        return grouped;
    }
    for neighbor in neighbors_with_edge_behavior(start, mode, structure) {
        grouped.entry(neighbor.mapped).or_default().push(neighbor);
    }
    grouped
}

/// The neighbour of `start` in `direction`, if the shape has one there.
///
/// `None` when `start` is outside the grid or no connection of the cell's
/// parity points in `direction`.
pub fn cell_neighbor_with_edge_behavior(
    start: Coordinate,
    mode: NeighborhoodMode,
    direction: CompassDirection,
    structure: &GridStructure,
) -> Option<CellNeighborWithEdgeBehavior> {
    if !structure.is_coordinate_valid(start) {
        return None;
    }
    connections(start, mode, structure.cell_shape())
        .iter()
        .find(|c| c.direction == direction)
        .map(|c| CellNeighborWithEdgeBehavior::resolve(start, c, structure))
}

/// Addressable neighbour coordinates of `start`, one per resolvable
/// connection.
///
/// A cell reached twice through a wrapped seam appears twice, which is
/// what neighbour counting on tiny tori expects.
pub fn valid_neighbor_coordinates(
    start: Coordinate,
    mode: NeighborhoodMode,
    structure: &GridStructure,
) -> SmallVec<[Coordinate; 12]> {
    neighbors_with_edge_behavior(start, mode, structure)
        .filter(CellNeighborWithEdgeBehavior::is_resolvable)
        .map(|n| n.mapped)
        .collect()
}

/// One edge result per distinct mapped coordinate, preferring a `Valid`
/// result when several connections land on the same cell.
pub fn neighbor_edge_results(
    start: Coordinate,
    mode: NeighborhoodMode,
    structure: &GridStructure,
) -> Vec<EdgeBehaviorResult> {
    let mut best: IndexMap<Coordinate, EdgeBehaviorResult> = IndexMap::new();
    for neighbor in neighbors_with_edge_behavior(start, mode, structure) {
        let result = neighbor.edge_result();
        best.entry(result.mapped)
            .and_modify(|current| {
                if current.action != EdgeBehaviorAction::Valid && result.action == EdgeBehaviorAction::Valid {
                    *current = result;
                }
            })
            .or_insert(result);
    }
    best.into_values().collect()
}

/// Every coordinate within `radius` connection steps of `start`, in
/// breadth-first order, excluding `start`. Bounds are ignored.
///
/// # Errors
///
/// [`GridError::RadiusOutOfRange`] above [`MAX_RADIUS`].
pub fn coordinates_of_neighbors(
    start: Coordinate,
    mode: NeighborhoodMode,
    shape: CellShape,
    radius: i32,
) -> Result<IndexSet<Coordinate>, GridError> {
    if radius > MAX_RADIUS {
        return Err(GridError::RadiusOutOfRange {
            radius,
            max: MAX_RADIUS,
        });
    }
    let mut seen: IndexSet<Coordinate> = IndexSet::new();
    if radius <= 0 {
        return Ok(seen);
    }
    seen.insert(start);
    let mut queue = VecDeque::from([(start, 0)]);
    while let Some((current, depth)) = queue.pop_front() {
        if depth == radius {
            continue;
        }
        for c in connections(current, mode, shape) {
            let next = current.offset(c.offset);
            if seen.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    seen.shift_remove(&start);
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::GridEdgeBehavior;
    use CompassDirection::*;

    fn structure(shape: CellShape, edge: GridEdgeBehavior) -> GridStructure {
        GridStructure::from_parts(shape, edge, 20, 12).unwrap()
    }

    fn offsets(start: Coordinate, mode: NeighborhoodMode, shape: CellShape) -> Vec<(i32, i32)> {
        cell_neighbors(start, mode, shape)
            .map(|n| (n.neighbor.x - start.x, n.neighbor.y - start.y))
            .collect()
    }

    #[test]
    fn max_counts() {
        use NeighborhoodMode::*;
        assert_eq!(max_neighbor_count(CellShape::Square, EdgesOnly), 4);
        assert_eq!(max_neighbor_count(CellShape::Square, EdgesAndVertices), 8);
        assert_eq!(max_neighbor_count(CellShape::Hexagon, EdgesOnly), 6);
        assert_eq!(max_neighbor_count(CellShape::Hexagon, EdgesAndVertices), 6);
        assert_eq!(max_neighbor_count(CellShape::Triangle, EdgesOnly), 3);
        assert_eq!(max_neighbor_count(CellShape::Triangle, EdgesAndVertices), 12);
    }

    #[test]
    fn max_counts_within_radius() {
        use NeighborhoodMode::*;
        let count = |shape, mode, r| max_neighbor_count_within_radius(shape, mode, r).unwrap();
        assert_eq!(count(CellShape::Square, EdgesAndVertices, 2), 25);
        assert_eq!(count(CellShape::Hexagon, EdgesOnly, 2), 19);
        assert_eq!(count(CellShape::Hexagon, EdgesAndVertices, 2), 19);
        assert_eq!(count(CellShape::Triangle, EdgesOnly, 2), 10);
        assert_eq!(count(CellShape::Square, EdgesOnly, 1), 4);
        assert_eq!(count(CellShape::Square, EdgesOnly, 0), 0);
        assert_eq!(count(CellShape::Square, EdgesOnly, -3), 0);
        assert!(max_neighbor_count_within_radius(CellShape::Square, EdgesOnly, MAX_RADIUS + 1).is_err());
    }

    #[test]
    fn bfs_disc_matches_radius_bound() {
        for shape in CellShape::ALL {
            for mode in NeighborhoodMode::ALL {
                for start in [Coordinate::new(4, 4), Coordinate::new(5, 4)] {
                    for r in 2..=4 {
                        let disc = coordinates_of_neighbors(start, mode, shape, r).unwrap();
                        let bound = max_neighbor_count_within_radius(shape, mode, r).unwrap();
                        assert_eq!(disc.len() + 1, bound, "{shape} {mode} r={r} at {start}");
                        assert!(!disc.contains(&start));
                    }
                }
            }
        }
    }

    #[test]
    fn radius_one_is_plain_neighbourhood() {
        let start = Coordinate::new(3, 2);
        let disc = coordinates_of_neighbors(start, NeighborhoodMode::EdgesOnly, CellShape::Hexagon, 1).unwrap();
        let direct: IndexSet<_> = cell_neighbors(start, NeighborhoodMode::EdgesOnly, CellShape::Hexagon)
            .map(|n| n.neighbor)
            .collect();
        assert_eq!(disc, direct);
        assert!(coordinates_of_neighbors(start, NeighborhoodMode::EdgesOnly, CellShape::Hexagon, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn square_offsets() {
        let c = Coordinate::new(5, 5);
        assert_eq!(
            offsets(c, NeighborhoodMode::EdgesOnly, CellShape::Square),
            vec![(0, -1), (1, 0), (0, 1), (-1, 0)]
        );
        assert_eq!(offsets(c, NeighborhoodMode::EdgesAndVertices, CellShape::Square).len(), 8);
    }

    #[test]
    fn hexagon_offsets_depend_on_column() {
        let even = Coordinate::new(4, 4);
        let odd = Coordinate::new(5, 4);
        assert_eq!(
            offsets(even, NeighborhoodMode::EdgesOnly, CellShape::Hexagon),
            vec![(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)]
        );
        assert_eq!(
            offsets(odd, NeighborhoodMode::EdgesOnly, CellShape::Hexagon),
            vec![(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)]
        );
        // Mode makes no difference.
        assert_eq!(
            offsets(odd, NeighborhoodMode::EdgesOnly, CellShape::Hexagon),
            offsets(odd, NeighborhoodMode::EdgesAndVertices, CellShape::Hexagon)
        );
    }

    #[test]
    fn triangle_offsets_depend_on_orientation() {
        let down = Coordinate::new(2, 2);
        let up = Coordinate::new(3, 2);
        assert_eq!(
            offsets(down, NeighborhoodMode::EdgesOnly, CellShape::Triangle),
            vec![(0, -1), (1, 0), (-1, 0)]
        );
        assert_eq!(
            offsets(up, NeighborhoodMode::EdgesOnly, CellShape::Triangle),
            vec![(1, 0), (0, 1), (-1, 0)]
        );
        assert_eq!(offsets(down, NeighborhoodMode::EdgesAndVertices, CellShape::Triangle).len(), 12);
        assert_ne!(
            offsets(down, NeighborhoodMode::EdgesAndVertices, CellShape::Triangle),
            offsets(up, NeighborhoodMode::EdgesAndVertices, CellShape::Triangle)
        );
    }

    #[test]
    fn neighbour_relation_is_irreflexive() {
        for shape in CellShape::ALL {
            for mode in NeighborhoodMode::ALL {
                let c = Coordinate::new(3, 3);
                assert!(!is_cell_neighbor(c, c, mode, shape));
            }
        }
        assert!(is_cell_neighbor(
            Coordinate::new(3, 3),
            Coordinate::new(4, 4),
            NeighborhoodMode::EdgesAndVertices,
            CellShape::Square
        ));
        assert!(!is_cell_neighbor(
            Coordinate::new(3, 3),
            Coordinate::new(4, 4),
            NeighborhoodMode::EdgesOnly,
            CellShape::Square
        ));
    }

    #[test]
    fn directions_form_the_ring() {
        let ring = cell_neighbor_directions(Coordinate::new(5, 4), NeighborhoodMode::EdgesOnly, CellShape::Hexagon);
        assert_eq!(ring.as_slice(), &[N, NE, SE, S, SW, NW]);
        assert_eq!(NE.distance_on_ring(NW, &ring), Ok(2));
        let ring = cell_neighbor_directions(Coordinate::new(2, 2), NeighborhoodMode::EdgesOnly, CellShape::Triangle);
        assert_eq!(ring.as_slice(), &[N, SE, SW]);
    }

    #[test]
    fn corner_under_block() {
        let s = structure(CellShape::Square, GridEdgeBehavior::BLOCK_XY);
        let grouped = cell_neighbors_with_edge_behavior(Coordinate::ORIGIN, NeighborhoodMode::EdgesAndVertices, &s);
        assert_eq!(grouped.len(), 8);
        let valid = valid_neighbor_coordinates(Coordinate::ORIGIN, NeighborhoodMode::EdgesAndVertices, &s);
        assert_eq!(valid.len(), 3);
        let blocked = grouped
            .values()
            .flatten()
            .filter(|n| n.action == EdgeBehaviorAction::Blocked)
            .count();
        assert_eq!(blocked, 5);
    }

    #[test]
    fn corner_under_wrap() {
        let s = structure(CellShape::Square, GridEdgeBehavior::WRAP_XY);
        let valid = valid_neighbor_coordinates(Coordinate::ORIGIN, NeighborhoodMode::EdgesAndVertices, &s);
        assert_eq!(valid.len(), 8);
        assert!(valid.contains(&Coordinate::new(19, 11)));
        let nw = cell_neighbor_with_edge_behavior(Coordinate::ORIGIN, NeighborhoodMode::EdgesAndVertices, NW, &s)
            .unwrap();
        assert_eq!(nw.neighbor, Coordinate::new(-1, -1));
        assert_eq!(nw.mapped, Coordinate::new(19, 11));
        assert_eq!(nw.action, EdgeBehaviorAction::Wrapped);
    }

    #[test]
    fn missing_direction_is_none() {
        let s = structure(CellShape::Triangle, GridEdgeBehavior::BLOCK_XY);
        let down = Coordinate::new(2, 2);
        assert!(cell_neighbor_with_edge_behavior(down, NeighborhoodMode::EdgesOnly, S, &s).is_none());
        assert!(cell_neighbor_with_edge_behavior(down, NeighborhoodMode::EdgesOnly, N, &s).is_some());
        assert!(cell_neighbor_with_edge_behavior(Coordinate::new(-1, 0), NeighborhoodMode::EdgesOnly, N, &s).is_none());
    }

    #[test]
    fn reflected_neighbours_collapse_onto_start_row() {
        let s = structure(CellShape::Square, GridEdgeBehavior::REFLECT_XY);
        // North of (3,0) reflects back onto (3,0) itself.
        let results = neighbor_edge_results(Coordinate::new(3, 0), NeighborhoodMode::EdgesOnly, &s);
        let north = results.iter().find(|r| r.original == Coordinate::new(3, -1)).unwrap();
        assert_eq!(north.mapped, Coordinate::new(3, 0));
        assert_eq!(north.action, EdgeBehaviorAction::Reflected);
    }

    #[test]
    fn edge_results_prefer_valid() {
        // Squash a reflection onto an in-bounds neighbour: (0, 0) reflecting
        // west lands on itself, south-west on (0, 1), which is also the
        // valid south neighbour.
        let s = structure(CellShape::Square, GridEdgeBehavior::REFLECT_XY);
        let results = neighbor_edge_results(Coordinate::new(0, 0), NeighborhoodMode::EdgesAndVertices, &s);
        let south = results.iter().find(|r| r.mapped == Coordinate::new(0, 1)).unwrap();
        assert_eq!(south.action, EdgeBehaviorAction::Valid);
        let mut mapped: Vec<_> = results.iter().map(|r| r.mapped).collect();
        mapped.sort();
        mapped.dedup();
        assert_eq!(mapped.len(), results.len());
    }

    #[test]
    fn invalid_start_has_no_grouped_neighbours() {
        let s = structure(CellShape::Square, GridEdgeBehavior::WRAP_XY);
        assert!(cell_neighbors_with_edge_behavior(Coordinate::new(20, 0), NeighborhoodMode::EdgesOnly, &s).is_empty());
    }
}
