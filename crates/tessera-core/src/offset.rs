//! Lattice displacements.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::coord::Coordinate;

/// A signed displacement between two lattice points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    /// Column delta.
    pub dx: i32,
    /// Row delta.
    pub dy: i32,
}

impl Offset {
    /// The zero displacement.
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    /// Create an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// The displacement that carries `from` onto `to`.
    pub const fn between(from: Coordinate, to: Coordinate) -> Self {
        Self {
            dx: to.x.wrapping_sub(from.x),
            dy: to.y.wrapping_sub(from.y),
        }
    }

    /// Whether both components are zero.
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Multiply both components by `factor`.
    pub const fn scale(&self, factor: i32) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }

    /// `|dx| + |dy|`.
    pub const fn manhattan_length(&self) -> u32 {
        self.dx.unsigned_abs() + self.dy.unsigned_abs()
    }

    /// Straight-line length.
    pub fn euclidean_length(&self) -> f64 {
        f64::from(self.dx).hypot(f64::from(self.dy))
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}

impl Mul<i32> for Offset {
    type Output = Offset;

    fn mul(self, rhs: i32) -> Offset {
        self.scale(rhs)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:+}, {:+}]", self.dx, self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Offset::new(1, -2);
        let b = Offset::new(-3, 5);
        assert_eq!(a + b, Offset::new(-2, 3));
        assert_eq!(a - b, Offset::new(4, -7));
        assert_eq!(-a, Offset::new(-1, 2));
        assert_eq!(a * 3, Offset::new(3, -6));
        assert!((a + -a).is_zero());
    }

    #[test]
    fn lengths() {
        let o = Offset::new(3, -4);
        assert_eq!(o.manhattan_length(), 7);
        assert!((o.euclidean_length() - 5.0).abs() < 1e-12);
        assert_eq!(Offset::ZERO.manhattan_length(), 0);
    }

    #[test]
    fn display_is_signed() {
        assert_eq!(Offset::new(1, -2).to_string(), "[+1, -2]");
    }
}
