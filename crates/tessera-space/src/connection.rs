//! Neighbour connection templates and their memoization table.
//!
//! A connection is a shape-relative, parity-relative template: "the cell
//! at this offset, in this direction, touches me along an edge (or at a
//! vertex)". Templates depend only on the shape, the neighbourhood mode
//! and the coordinate's parity, so they are computed once per
//! [`ConnectionKey`] and shared by every coordinate.
//!
//! Keys are normalized before lookup. Squares have a single parity class,
//! and hexagons have no vertex-only neighbours, so their templates ignore
//! parity and mode respectively. Triangles need both.

use std::fmt;
use std::sync::OnceLock;

use smallvec::SmallVec;
use tessera_core::{Coordinate, Offset};

use crate::compass::CompassDirection;
use crate::shape::{CellShape, Parity};

/// Whether only edge-adjacent cells count as neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NeighborhoodMode {
    /// Cells sharing an edge.
    EdgesOnly,
    /// Cells sharing an edge or a vertex.
    EdgesAndVertices,
}

impl NeighborhoodMode {
    /// Both modes.
    pub const ALL: [NeighborhoodMode; 2] =
        [NeighborhoodMode::EdgesOnly, NeighborhoodMode::EdgesAndVertices];
}

impl fmt::Display for NeighborhoodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EdgesOnly => "edges-only",
            Self::EdgesAndVertices => "edges-and-vertices",
        })
    }
}

/// How a neighbour touches the reference cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellConnectionType {
    /// Shares an edge.
    Edge,
    /// Shares only a vertex.
    Vertex,
}

/// One neighbour slot of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellNeighborConnection {
    /// Displacement from the reference cell.
    pub offset: Offset,
    /// Direction of the neighbour as seen from the reference cell.
    pub direction: CompassDirection,
    /// Edge or vertex contact.
    pub connection_type: CellConnectionType,
}

impl CellNeighborConnection {
    const fn edge(dx: i32, dy: i32, direction: CompassDirection) -> Self {
        Self {
            offset: Offset::new(dx, dy),
            direction,
            connection_type: CellConnectionType::Edge,
        }
    }

    const fn vertex(dx: i32, dy: i32, direction: CompassDirection) -> Self {
        Self {
            offset: Offset::new(dx, dy),
            direction,
            connection_type: CellConnectionType::Vertex,
        }
    }
}

/// Normalized memoization key: the minimal facts that determine a cell's
/// connection templates.
///
/// - Square: shape + mode (`parity` is always [`Parity::Uniform`]).
/// - Hexagon: shape + parity (`mode` is always `None`).
/// - Triangle: shape + mode + parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    shape: CellShape,
    mode: Option<NeighborhoodMode>,
    parity: Parity,
}

impl ConnectionKey {
    /// Number of distinct normalized keys.
    pub const COUNT: usize = 8;

    /// Every normalized key, in table order.
    pub const ALL: [ConnectionKey; Self::COUNT] = [
        Self::raw(CellShape::Square, Some(NeighborhoodMode::EdgesOnly), Parity::Uniform),
        Self::raw(CellShape::Square, Some(NeighborhoodMode::EdgesAndVertices), Parity::Uniform),
        Self::raw(CellShape::Hexagon, None, Parity::Shifted),
        Self::raw(CellShape::Hexagon, None, Parity::Unshifted),
        Self::raw(CellShape::Triangle, Some(NeighborhoodMode::EdgesOnly), Parity::PointingUp),
        Self::raw(CellShape::Triangle, Some(NeighborhoodMode::EdgesOnly), Parity::PointingDown),
        Self::raw(CellShape::Triangle, Some(NeighborhoodMode::EdgesAndVertices), Parity::PointingUp),
        Self::raw(CellShape::Triangle, Some(NeighborhoodMode::EdgesAndVertices), Parity::PointingDown),
    ];

    const fn raw(shape: CellShape, mode: Option<NeighborhoodMode>, parity: Parity) -> Self {
        Self {
            shape,
            mode,
            parity,
        }
    }

    /// Normalized key for a shape, mode and parity class.
    ///
    /// `parity` should be one of `shape.parities()`; squares ignore it and
    /// hexagons ignore `mode`.
    pub const fn new(shape: CellShape, mode: NeighborhoodMode, parity: Parity) -> Self {
        match shape {
            CellShape::Square => Self::raw(shape, Some(mode), Parity::Uniform),
            CellShape::Hexagon => Self::raw(shape, None, parity),
            CellShape::Triangle => Self::raw(shape, Some(mode), parity),
        }
    }

    /// Key for `coordinate` under `shape` and `mode`.
    pub const fn for_coordinate(coordinate: Coordinate, mode: NeighborhoodMode, shape: CellShape) -> Self {
        Self::new(shape, mode, shape.parity(coordinate))
    }

    /// The cell shape.
    pub const fn shape(&self) -> CellShape {
        self.shape
    }

    /// The mode, or `None` where the shape ignores it.
    pub const fn mode(&self) -> Option<NeighborhoodMode> {
        self.mode
    }

    /// The parity class.
    pub const fn parity(&self) -> Parity {
        self.parity
    }

    /// Position in [`ConnectionKey::ALL`].
    const fn slot(&self) -> usize {
        match (self.shape, self.mode, self.parity) {
            (CellShape::Square, Some(NeighborhoodMode::EdgesOnly), _) => 0,
            (CellShape::Square, _, _) => 1,
            (CellShape::Hexagon, _, Parity::Shifted) => 2,
            (CellShape::Hexagon, _, _) => 3,
            (CellShape::Triangle, Some(NeighborhoodMode::EdgesOnly), Parity::PointingUp) => 4,
            (CellShape::Triangle, Some(NeighborhoodMode::EdgesOnly), _) => 5,
            (CellShape::Triangle, _, Parity::PointingUp) => 6,
            (CellShape::Triangle, _, _) => 7,
        }
    }
}

/// Connection list for one key; inline up to the triangle maximum of 12.
pub type Connections = SmallVec<[CellNeighborConnection; 12]>;

/// Connection templates for every normalized key, computed eagerly.
#[derive(Debug)]
pub struct ConnectionTable {
    entries: [Connections; ConnectionKey::COUNT],
}

impl ConnectionTable {
    /// Compute every template list.
    pub fn new() -> Self {
        Self {
            entries: std::array::from_fn(|slot| compute(ConnectionKey::ALL[slot])),
        }
    }

    /// The process-wide table, built on first use.
    pub fn shared() -> &'static ConnectionTable {
        static TABLE: OnceLock<ConnectionTable> = OnceLock::new();
        TABLE.get_or_init(ConnectionTable::new)
    }

    /// Templates for `key`.
    pub fn get(&self, key: ConnectionKey) -> &[CellNeighborConnection] {
        &self.entries[key.slot()]
    }

    /// Templates for `coordinate` under `shape` and `mode`.
    pub fn connections(
        &self,
        coordinate: Coordinate,
        mode: NeighborhoodMode,
        shape: CellShape,
    ) -> &[CellNeighborConnection] {
        self.get(ConnectionKey::for_coordinate(coordinate, mode, shape))
    }
}

impl Default for ConnectionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Templates for `coordinate` from the shared table.
pub fn connections(coordinate: Coordinate, mode: NeighborhoodMode, shape: CellShape) -> &'static [CellNeighborConnection] {
    ConnectionTable::shared().connections(coordinate, mode, shape)
}

fn compute(key: ConnectionKey) -> Connections {
    use CompassDirection::*;
    use NeighborhoodMode::*;
    type C = CellNeighborConnection;

    let templates: &[C] = match (key.shape, key.mode, key.parity) {
        (CellShape::Square, Some(EdgesOnly), _) => &[
            C::edge(0, -1, N),
            C::edge(1, 0, E),
            C::edge(0, 1, S),
            C::edge(-1, 0, W),
        ],
        (CellShape::Square, _, _) => &[
            C::edge(0, -1, N),
            C::vertex(1, -1, NE),
            C::edge(1, 0, E),
            C::vertex(1, 1, SE),
            C::edge(0, 1, S),
            C::vertex(-1, 1, SW),
            C::edge(-1, 0, W),
            C::vertex(-1, -1, NW),
        ],
        (CellShape::Hexagon, _, Parity::Shifted) => &[
            C::edge(0, -1, N),
            C::edge(1, 0, NE),
            C::edge(1, 1, SE),
            C::edge(0, 1, S),
            C::edge(-1, 1, SW),
            C::edge(-1, 0, NW),
        ],
        (CellShape::Hexagon, _, _) => &[
            C::edge(0, -1, N),
            C::edge(1, -1, NE),
            C::edge(1, 0, SE),
            C::edge(0, 1, S),
            C::edge(-1, 0, SW),
            C::edge(-1, -1, NW),
        ],
        (CellShape::Triangle, Some(EdgesOnly), Parity::PointingUp) => &[
            C::edge(1, 0, NE),
            C::edge(0, 1, S),
            C::edge(-1, 0, NW),
        ],
        (CellShape::Triangle, Some(EdgesOnly), _) => &[
            C::edge(0, -1, N),
            C::edge(1, 0, SE),
            C::edge(-1, 0, SW),
        ],
        (CellShape::Triangle, _, Parity::PointingUp) => &[
            C::vertex(0, -1, N),
            C::vertex(1, -1, NNE),
            C::edge(1, 0, NE),
            C::vertex(2, 0, E),
            C::vertex(2, 1, SE),
            C::vertex(1, 1, SSE),
            C::edge(0, 1, S),
            C::vertex(-1, 1, SSW),
            C::vertex(-2, 1, SW),
            C::vertex(-2, 0, W),
            C::edge(-1, 0, NW),
            C::vertex(-1, -1, NNW),
        ],
        (CellShape::Triangle, _, _) => &[
            C::edge(0, -1, N),
            C::vertex(1, -1, NNE),
            C::vertex(2, -1, NE),
            C::vertex(2, 0, E),
            C::edge(1, 0, SE),
            C::vertex(1, 1, SSE),
            C::vertex(0, 1, S),
            C::vertex(-1, 1, SSW),
            C::edge(-1, 0, SW),
            C::vertex(-2, 0, W),
            C::vertex(-2, -1, NW),
            C::vertex(-1, -1, NNW),
        ],
    };
    templates.iter().copied().collect()
}
