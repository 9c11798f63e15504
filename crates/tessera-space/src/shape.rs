//! Cell shapes and their parity rules.

use std::fmt;

use tessera_core::Coordinate;

use crate::edge::EdgeBehavior;

/// The polygon tiling a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellShape {
    /// Alternating up/down triangles.
    Triangle,
    /// Axis-aligned squares.
    Square,
    /// Flat-topped hexagons in offset columns (odd columns sit half a
    /// cell lower).
    Hexagon,
}

/// Coordinate-derived classifier selecting a shape's neighbour geometry.
///
/// Squares look the same everywhere. Triangles alternate orientation and
/// hexagon columns alternate vertical offset, so their neighbour offsets
/// depend on which class a coordinate falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parity {
    /// Geometry independent of position (squares).
    Uniform,
    /// Triangle with its apex at the top.
    PointingUp,
    /// Triangle with its apex at the bottom.
    PointingDown,
    /// Hexagon in an odd column.
    Shifted,
    /// Hexagon in an even column.
    Unshifted,
}

impl CellShape {
    /// All shapes.
    pub const ALL: [CellShape; 3] = [CellShape::Triangle, CellShape::Square, CellShape::Hexagon];

    /// Number of polygon corners.
    pub const fn vertex_count(self) -> u32 {
        match self {
            Self::Triangle => 3,
            Self::Square => 4,
            Self::Hexagon => 6,
        }
    }

    /// The parity class of `coordinate` under this shape.
    pub const fn parity(self, coordinate: Coordinate) -> Parity {
        match self {
            Self::Square => Parity::Uniform,
            Self::Triangle => {
                if coordinate.is_triangle_pointing_down() {
                    Parity::PointingDown
                } else {
                    Parity::PointingUp
                }
            }
            Self::Hexagon => {
                if coordinate.has_hexagon_offset() {
                    Parity::Shifted
                } else {
                    Parity::Unshifted
                }
            }
        }
    }

    /// Every parity class this shape produces.
    pub const fn parities(self) -> &'static [Parity] {
        match self {
            Self::Square => &[Parity::Uniform],
            Self::Triangle => &[Parity::PointingUp, Parity::PointingDown],
            Self::Hexagon => &[Parity::Shifted, Parity::Unshifted],
        }
    }

    /// Width must be a multiple of this when X uses `edge`.
    pub const fn required_width_multiple(self, edge: EdgeBehavior) -> i32 {
        match (self, edge) {
            (Self::Triangle | Self::Hexagon, EdgeBehavior::Wrap) => 2,
            _ => 1,
        }
    }

    /// Height must be a multiple of this when Y uses `edge`.
    pub const fn required_height_multiple(self, edge: EdgeBehavior) -> i32 {
        match (self, edge) {
            (Self::Triangle, EdgeBehavior::Wrap) => 4,
            _ => 1,
        }
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Square => "square",
            Self::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for CellShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
