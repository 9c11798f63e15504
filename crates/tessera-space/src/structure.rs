//! Validated topology + size: the origin of every coordinate query.

use std::fmt;
use std::iter::FusedIterator;

use tessera_core::Coordinate;

use crate::connection::ConnectionTable;
use crate::edge::{Axis, EdgeBehavior, EdgeBehaviorAction, EdgeBehaviorResult, GridEdgeBehavior};
use crate::error::GridError;
use crate::shape::CellShape;
use crate::size::GridSize;
use crate::topology::GridTopology;

/// An immutable grid description: shape, boundary policy and size.
///
/// Construction checks that every wrapping axis spans whole tiling
/// periods of the shape, so parity-dependent neighbour geometry matches
/// across the seam. Triangles need a height that is a multiple of 4 when
/// Y wraps and an even width when X wraps; hexagons need an even width
/// when X wraps.
///
/// # Examples
///
/// ```
/// use tessera_space::{CellShape, GridEdgeBehavior, GridSize, GridStructure, GridTopology};
///
/// let ok = GridStructure::new(
///     GridTopology::new(CellShape::Hexagon, GridEdgeBehavior::WRAP_XY),
///     GridSize::new(20, 9).unwrap(),
/// );
/// assert!(ok.is_ok());
///
/// let odd = GridStructure::new(
///     GridTopology::new(CellShape::Hexagon, GridEdgeBehavior::WRAP_XY),
///     GridSize::new(9, 20).unwrap(),
/// );
/// assert!(odd.is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridStructure {
    topology: GridTopology,
    size: GridSize,
}

impl GridStructure {
    /// Validate and create a structure.
    ///
    /// Also warms the shared neighbour connection table so that inner
    /// loops never compute templates lazily.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::WrapMultiple`] citing the required multiple
    /// when a wrapping axis does not fit the shape's tiling period.
    pub fn new(topology: GridTopology, size: GridSize) -> Result<Self, GridError> {
        let shape = topology.shape();
        check_wrap(shape, Axis::X, size.width(), shape.required_width_multiple(topology.edge_behavior_x()))?;
        check_wrap(shape, Axis::Y, size.height(), shape.required_height_multiple(topology.edge_behavior_y()))?;
        let _ = ConnectionTable::shared();
        log::debug!("grid structure {topology} {size} ready");
        Ok(Self { topology, size })
    }

    /// Shorthand building topology and size in one go.
    pub fn from_parts(
        shape: CellShape,
        edge_behavior: GridEdgeBehavior,
        width: i32,
        height: i32,
    ) -> Result<Self, GridError> {
        Self::new(
            GridTopology::new(shape, edge_behavior),
            GridSize::new(width, height)?,
        )
    }

    /// Shape and boundary policy.
    pub const fn topology(&self) -> GridTopology {
        self.topology
    }

    /// Dimensions.
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// The tiling.
    pub const fn cell_shape(&self) -> CellShape {
        self.topology.shape()
    }

    /// Policy for columns beyond the grid.
    pub const fn edge_behavior_x(&self) -> EdgeBehavior {
        self.topology.edge_behavior_x()
    }

    /// Policy for rows beyond the grid.
    pub const fn edge_behavior_y(&self) -> EdgeBehavior {
        self.topology.edge_behavior_y()
    }

    /// Number of columns.
    pub const fn width(&self) -> i32 {
        self.size.width()
    }

    /// Number of rows.
    pub const fn height(&self) -> i32 {
        self.size.height()
    }

    /// `width * height`.
    pub const fn cell_count(&self) -> usize {
        self.size.area()
    }

    /// The bottom-right cell.
    pub const fn max_coordinate(&self) -> Coordinate {
        Coordinate::new(self.width() - 1, self.height() - 1)
    }

    /// Whether `coordinate` lies inside the grid.
    pub const fn is_coordinate_valid(&self, coordinate: Coordinate) -> bool {
        coordinate.is_within(self.width(), self.height())
    }

    /// Every valid coordinate, row-major, `(0,0)` first and
    /// `(width-1, height-1)` last.
    ///
    /// The iterator is `Clone`, so it can be restarted from any point.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            width: self.width(),
            front: 0,
            back: self.cell_count(),
        }
    }

    /// Row-major rank of `coordinate`, or `None` outside the grid.
    pub fn index_of(&self, coordinate: Coordinate) -> Option<usize> {
        if !self.is_coordinate_valid(coordinate) {
            return None;
        }
        Some(coordinate.y as usize * self.width() as usize + coordinate.x as usize)
    }

    /// Coordinate with row-major rank `index`, or `None` past the end.
    pub fn coordinate_at(&self, index: usize) -> Option<Coordinate> {
        if index >= self.cell_count() {
            return None;
        }
        Some(coordinate_at(self.width(), index))
    }

    /// Resolve `coordinate` against both axes' policies.
    ///
    /// Each axis resolves independently. The combined action is `Valid`
    /// only when both are; otherwise the dominant action wins (Blocked over
    /// Absorbed over Reflected over Wrapped). Blocked and Absorbed results
    /// keep the original coordinate. Never fails.
    pub fn apply_edge_behavior(&self, coordinate: Coordinate) -> EdgeBehaviorResult {
        let (x, action_x) = self.edge_behavior_x().resolve(coordinate.x, self.width());
        let (y, action_y) = self.edge_behavior_y().resolve(coordinate.y, self.height());
        let action = action_x.combine(action_y);
        let mapped = match action {
            EdgeBehaviorAction::Wrapped | EdgeBehaviorAction::Reflected => Coordinate::new(x, y),
            EdgeBehaviorAction::Valid | EdgeBehaviorAction::Blocked | EdgeBehaviorAction::Absorbed => {
                coordinate
            }
        };
        EdgeBehaviorResult {
            original: coordinate,
            mapped,
            action,
        }
    }

    /// Just the action of [`apply_edge_behavior`](Self::apply_edge_behavior).
    pub fn edge_behavior_action(&self, coordinate: Coordinate) -> EdgeBehaviorAction {
        self.apply_edge_behavior(coordinate).action
    }

    /// True for Valid, Wrapped and Reflected coordinates.
    pub fn is_valid_edge_coordinate(&self, coordinate: Coordinate) -> bool {
        self.edge_behavior_action(coordinate).is_resolvable()
    }
}

fn check_wrap(shape: CellShape, axis: Axis, size: i32, multiple: i32) -> Result<(), GridError> {
    if size % multiple != 0 {
        return Err(GridError::WrapMultiple {
            shape,
            axis,
            size,
            multiple,
        });
    }
    Ok(())
}

fn coordinate_at(width: i32, index: usize) -> Coordinate {
    let w = width as usize;
    Coordinate::new((index % w) as i32, (index / w) as i32)
}

impl fmt::Display for GridStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.topology, self.size)
    }
}

/// Row-major coordinate iterator returned by [`GridStructure::coordinates`].
#[derive(Clone, Debug)]
pub struct Coordinates {
    width: i32,
    front: usize,
    back: usize,
}

impl Iterator for Coordinates {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.front >= self.back {
            return None;
        }
        let c = coordinate_at(self.width, self.front);
        self.front += 1;
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Coordinate> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for Coordinates {
    fn next_back(&mut self) -> Option<Coordinate> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(coordinate_at(self.width, self.back))
    }
}

impl ExactSizeIterator for Coordinates {}

impl FusedIterator for Coordinates {}
