//! Shape + boundary policy.

use std::fmt;

use crate::edge::{EdgeBehavior, GridEdgeBehavior};
use crate::shape::CellShape;

/// A cell shape paired with a two-axis boundary policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridTopology {
    shape: CellShape,
    edge_behavior: GridEdgeBehavior,
}

impl GridTopology {
    /// Pair `shape` with `edge_behavior`.
    pub const fn new(shape: CellShape, edge_behavior: GridEdgeBehavior) -> Self {
        Self {
            shape,
            edge_behavior,
        }
    }

    /// The tiling.
    pub const fn shape(&self) -> CellShape {
        self.shape
    }

    /// The combined policy.
    pub const fn edge_behavior(&self) -> GridEdgeBehavior {
        self.edge_behavior
    }

    /// Policy for columns beyond the grid.
    pub const fn edge_behavior_x(&self) -> EdgeBehavior {
        self.edge_behavior.x
    }

    /// Policy for rows beyond the grid.
    pub const fn edge_behavior_y(&self) -> EdgeBehavior {
        self.edge_behavior.y
    }
}

impl fmt::Display for GridTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.shape, self.edge_behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_axis_accessors_differ() {
        let t = GridTopology::new(CellShape::Square, GridEdgeBehavior::BLOCK_X_WRAP_Y);
        assert_eq!(t.edge_behavior_x(), EdgeBehavior::Block);
        assert_eq!(t.edge_behavior_y(), EdgeBehavior::Wrap);
        assert_eq!(t.to_string(), "square block-x/wrap-y");
    }
}
