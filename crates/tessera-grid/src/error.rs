//! Errors raised while populating grid models.

use std::error::Error;
use std::fmt;

use tessera_core::Coordinate;
use tessera_space::GridStructure;

/// Errors from initializers and bulk model operations.
///
/// Single-cell reads and writes never return errors; passing a coordinate
/// outside the grid to them is a contract violation.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// Random placement ran out of attempts or free cells.
    PlacementFailed {
        /// Entities placed before giving up.
        placed: usize,
        /// Entities requested.
        requested: usize,
    },
    /// A percentage or probability outside `0.0..=1.0` (or NaN).
    InvalidPercent {
        /// The rejected value.
        value: f64,
    },
    /// A cell list named a coordinate outside the grid.
    CoordinateOutsideGrid {
        /// The offending coordinate.
        coordinate: Coordinate,
    },
    /// Two models that must share a structure do not.
    StructureMismatch {
        /// Structure of the receiving model.
        expected: GridStructure,
        /// Structure of the source model.
        found: GridStructure,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlacementFailed { placed, requested } => {
                write!(f, "unable to place all entities: placed {placed} of {requested}")
            }
            Self::InvalidPercent { value } => {
                write!(f, "percentage must be within 0.0..=1.0, got {value}")
            }
            Self::CoordinateOutsideGrid { coordinate } => {
                write!(f, "coordinate {coordinate} is outside the grid")
            }
            Self::StructureMismatch { expected, found } => {
                write!(f, "structure mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl Error for ModelError {}

/// Reject NaN and values outside `0.0..=1.0`.
pub(crate) fn check_percent(value: f64) -> Result<f64, ModelError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::InvalidPercent { value })
    }
}
