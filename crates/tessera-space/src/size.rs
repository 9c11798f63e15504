//! Validated grid dimensions.

use std::fmt;

use crate::edge::Axis;
use crate::error::GridError;

/// Width and height of a grid, each within `[MIN_SIZE, MAX_SIZE]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: i32,
    height: i32,
}

impl GridSize {
    /// Smallest accepted dimension.
    pub const MIN_SIZE: i32 = 8;
    /// Largest accepted dimension (2^14).
    pub const MAX_SIZE: i32 = 16_384;

    /// Validate and create a size.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] naming the first dimension
    /// outside `[MIN_SIZE, MAX_SIZE]`.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        check(Axis::X, width)?;
        check(Axis::Y, height)?;
        Ok(Self { width, height })
    }

    /// A `side` x `side` size.
    pub fn square(side: i32) -> Result<Self, GridError> {
        Self::new(side, side)
    }

    /// Number of columns.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Dimension along `axis`.
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// `width * height`.
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether width equals height.
    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }
}

fn check(axis: Axis, value: i32) -> Result<(), GridError> {
    if !(GridSize::MIN_SIZE..=GridSize::MAX_SIZE).contains(&value) {
        return Err(GridError::InvalidSize {
            axis,
            value,
            min: GridSize::MIN_SIZE,
            max: GridSize::MAX_SIZE,
        });
    }
    Ok(())
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
