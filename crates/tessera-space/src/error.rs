//! Error types for grid construction and topology queries.

use std::fmt;

use crate::compass::CompassDirection;
use crate::edge::Axis;
use crate::shape::CellShape;

/// Errors arising from grid construction or topology queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid dimension lies outside the supported range.
    InvalidSize {
        /// Which dimension.
        axis: Axis,
        /// The rejected value.
        value: i32,
        /// Smallest accepted value.
        min: i32,
        /// Largest accepted value.
        max: i32,
    },
    /// A wrapping axis is not a multiple of the shape's tiling period.
    ///
    /// Wrapping must carry parity-dependent neighbour geometry across the
    /// seam unchanged, which only works for whole periods.
    WrapMultiple {
        /// The cell shape imposing the constraint.
        shape: CellShape,
        /// The wrapping axis.
        axis: Axis,
        /// The rejected size along that axis.
        size: i32,
        /// The required multiple.
        multiple: i32,
    },
    /// A neighbourhood radius outside `[0, max]`.
    RadiusOutOfRange {
        /// The rejected radius.
        radius: i32,
        /// Largest accepted radius.
        max: i32,
    },
    /// A direction is not part of the ring it was looked up in.
    DirectionNotOnRing {
        /// The missing direction.
        direction: CompassDirection,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize {
                axis,
                value,
                min,
                max,
            } => write!(
                f,
                "grid {} {value} outside supported range [{min}, {max}]",
                axis.dimension_name()
            ),
            Self::WrapMultiple {
                shape,
                axis,
                size,
                multiple,
            } => write!(
                f,
                "{shape} grid wrapping on {axis} requires {} to be a multiple of {multiple}, got {size}",
                axis.dimension_name()
            ),
            Self::RadiusOutOfRange { radius, max } => {
                write!(f, "neighbourhood radius {radius} outside [0, {max}]")
            }
            Self::DirectionNotOnRing { direction } => {
                write!(f, "direction {direction} is not on the given ring")
            }
        }
    }
}

impl std::error::Error for GridError {}
