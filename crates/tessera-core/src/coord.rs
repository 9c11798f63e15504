//! Integer lattice points.

use std::fmt;
use std::ops::{Add, Sub};

use crate::offset::Offset;

/// A cell position on the 2D lattice.
///
/// Coordinates are plain values: `x` grows to the east, `y` grows to the
/// south, and the top-left cell of every grid is `(0, 0)`. Whether a
/// coordinate is addressable depends on the enclosing grid structure;
/// candidate neighbours of border cells routinely lie outside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coordinate {
    /// The top-left cell of every grid.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Sentinel meaning "no such coordinate".
    pub const ILLEGAL: Self = Self {
        x: i32::MIN,
        y: i32::MIN,
    };

    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this coordinate can never be addressable.
    ///
    /// True for [`Coordinate::ILLEGAL`] and for anything with a negative
    /// component, since every grid starts at the origin.
    pub const fn is_illegal(&self) -> bool {
        self.x < 0 || self.y < 0
    }

    /// Whether `0 <= x < width` and `0 <= y < height`.
    pub const fn is_within(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }

    /// Translate by `offset`.
    ///
    /// Uses wrapping arithmetic so that probing around the sentinel never
    /// panics; the result is then simply out of bounds.
    pub const fn offset(&self, offset: Offset) -> Self {
        Self {
            x: self.x.wrapping_add(offset.dx),
            y: self.y.wrapping_add(offset.dy),
        }
    }

    /// Displacement from `self` to `target`.
    pub const fn offset_to(&self, target: Coordinate) -> Offset {
        Offset::between(*self, target)
    }

    /// Whether a triangle cell at this position points down.
    ///
    /// Triangles alternate orientation along both axes: a cell points down
    /// iff its column and row have the same parity. Euclidean remainders
    /// keep the tiling consistent for out-of-grid candidates.
    pub const fn is_triangle_pointing_down(&self) -> bool {
        self.x.rem_euclid(2) == self.y.rem_euclid(2)
    }

    /// Whether a hexagon cell at this position sits half a row lower than
    /// its even-column neighbours (true for odd columns).
    pub const fn has_hexagon_offset(&self) -> bool {
        self.x.rem_euclid(2) == 1
    }

    /// Whether `x` is even.
    pub const fn has_even_x(&self) -> bool {
        self.x.rem_euclid(2) == 0
    }

    /// Whether `y` is even.
    pub const fn has_even_y(&self) -> bool {
        self.y.rem_euclid(2) == 0
    }
}

impl Add<Offset> for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Offset) -> Coordinate {
        self.offset(rhs)
    }
}

impl Sub for Coordinate {
    type Output = Offset;

    fn sub(self, rhs: Coordinate) -> Offset {
        Offset::between(rhs, self)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ILLEGAL {
            write!(f, "(illegal)")
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn illegal_sentinel() {
        assert!(Coordinate::ILLEGAL.is_illegal());
        assert!(Coordinate::new(-1, 3).is_illegal());
        assert!(!Coordinate::ORIGIN.is_illegal());
        assert_eq!(Coordinate::ILLEGAL.to_string(), "(illegal)");
    }

    #[test]
    fn bounds() {
        let c = Coordinate::new(19, 9);
        assert!(c.is_within(20, 10));
        assert!(!c.is_within(19, 10));
        assert!(!Coordinate::new(0, -1).is_within(20, 10));
    }

    #[test]
    fn triangle_orientation_alternates() {
        assert!(Coordinate::new(0, 0).is_triangle_pointing_down());
        assert!(!Coordinate::new(1, 0).is_triangle_pointing_down());
        assert!(!Coordinate::new(0, 1).is_triangle_pointing_down());
        assert!(Coordinate::new(1, 1).is_triangle_pointing_down());
        // Negative candidates continue the same tiling.
        assert!(Coordinate::new(-1, 1).is_triangle_pointing_down());
        assert!(!Coordinate::new(-1, 0).is_triangle_pointing_down());
    }

    #[test]
    fn hexagon_offset_on_odd_columns() {
        assert!(!Coordinate::new(0, 5).has_hexagon_offset());
        assert!(Coordinate::new(1, 5).has_hexagon_offset());
        assert!(Coordinate::new(-1, 0).has_hexagon_offset());
    }

    #[test]
    fn offset_near_sentinel_does_not_panic() {
        let c = Coordinate::ILLEGAL.offset(Offset::new(-1, -1));
        assert!(!c.is_within(100, 100));
    }

    proptest! {
        #[test]
        fn offset_between_is_inverse(
            ax in -1000i32..1000, ay in -1000i32..1000,
            bx in -1000i32..1000, by in -1000i32..1000,
        ) {
            let a = Coordinate::new(ax, ay);
            let b = Coordinate::new(bx, by);
            prop_assert_eq!(a.offset(Offset::between(a, b)), b);
            prop_assert_eq!(a + (b - a), b);
        }
    }
}
