//! Integer lattice coordinates.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A position on the integer room lattice.
///
/// Coordinates are the sole addressing key of the spatial index. They
/// support vector addition and subtraction; no total order is implied
/// (the spatial index orders by `z`, then `y`, then `x` internally).
///
/// # Examples
///
/// ```
/// use atlas_core::Coordinate;
///
/// let a = Coordinate::new(1, 2, 3);
/// let b = Coordinate::new(1, 1, 1);
/// assert_eq!(a - b, Coordinate::new(0, 1, 2));
/// assert_eq!(a + b, Coordinate::new(2, 3, 4));
/// assert_eq!(-b, Coordinate::new(-1, -1, -1));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// West (negative) to east (positive).
    pub x: i32,
    /// North/south axis.
    pub y: i32,
    /// Layer: down (negative) to up (positive).
    pub z: i32,
}

impl Coordinate {
    /// The origin `(0, 0, 0)`.
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0, z: 0 };

    /// Create a coordinate from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum of two coordinates.
    pub fn min_corner(a: Coordinate, b: Coordinate) -> Coordinate {
        Coordinate::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
    }

    /// Component-wise maximum of two coordinates.
    pub fn max_corner(a: Coordinate, b: Coordinate) -> Coordinate {
        Coordinate::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
    }

    /// Sum of the three components, widened so it cannot overflow.
    pub fn component_sum(&self) -> i64 {
        i64::from(self.x) + i64::from(self.y) + i64::from(self.z)
    }

    /// Chebyshev (L∞) distance between two coordinates.
    pub fn chebyshev_distance(&self, other: &Coordinate) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Coordinate {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl AddAssign for Coordinate {
    fn add_assign(&mut self, rhs: Coordinate) {
        *self = *self + rhs;
    }
}

impl SubAssign for Coordinate {
    fn sub_assign(&mut self, rhs: Coordinate) {
        *self = *self - rhs;
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;

    fn neg(self) -> Coordinate {
        Coordinate::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_component_wise() {
        let a = Coordinate::new(3, -1, 7);
        let b = Coordinate::new(-2, 4, 7);
        assert_eq!(Coordinate::min_corner(a, b), Coordinate::new(-2, -1, 7));
        assert_eq!(Coordinate::max_corner(a, b), Coordinate::new(3, 4, 7));
    }

    #[test]
    fn assign_ops_match_binary_ops() {
        let mut c = Coordinate::new(1, 1, 1);
        c += Coordinate::new(2, 0, -1);
        assert_eq!(c, Coordinate::new(3, 1, 0));
        c -= Coordinate::new(3, 1, 0);
        assert_eq!(c, Coordinate::ORIGIN);
    }

    #[test]
    fn component_sum_does_not_overflow() {
        let c = Coordinate::new(i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(c.component_sum(), 3 * i64::from(i32::MAX));
    }

    #[test]
    fn display_is_a_triple() {
        assert_eq!(Coordinate::new(1, -2, 3).to_string(), "(1, -2, 3)");
    }

    #[test]
    fn chebyshev_takes_largest_axis() {
        let a = Coordinate::new(0, 0, 0);
        let b = Coordinate::new(2, -5, 1);
        assert_eq!(a.chebyshev_distance(&b), 5);
    }
}
