//! Axis-aligned coordinate boxes.

use atlas_core::Coordinate;

/// A closed, axis-aligned box of coordinates.
///
/// Always normalised: `min` is component-wise `<=` `max`, whatever order
/// the two corners were given in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateBox {
    /// Minimum corner (inclusive).
    pub min: Coordinate,
    /// Maximum corner (inclusive).
    pub max: Coordinate,
}

impl CoordinateBox {
    /// Build a box from two arbitrary opposite corners.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min: Coordinate::min_corner(a, b),
            max: Coordinate::max_corner(a, b),
        }
    }

    /// A copy grown by `radius` on both sides of every axis.
    ///
    /// Saturates at the `i32` limits instead of overflowing.
    pub fn expanded(&self, radius: Coordinate) -> Self {
        Self {
            min: Coordinate::new(
                self.min.x.saturating_sub(radius.x),
                self.min.y.saturating_sub(radius.y),
                self.min.z.saturating_sub(radius.z),
            ),
            max: Coordinate::new(
                self.max.x.saturating_add(radius.x),
                self.max.y.saturating_add(radius.y),
                self.max.z.saturating_add(radius.z),
            ),
        }
    }

    /// Whether `c` lies inside the box (boundary included).
    pub fn contains(&self, c: &Coordinate) -> bool {
        (self.min.x..=self.max.x).contains(&c.x)
            && (self.min.y..=self.max.y).contains(&c.y)
            && (self.min.z..=self.max.z).contains(&c.z)
    }

    /// Number of lattice points in the box.
    pub fn volume(&self) -> u64 {
        let dx = u64::from(self.max.x.abs_diff(self.min.x)) + 1;
        let dy = u64::from(self.max.y.abs_diff(self.min.y)) + 1;
        let dz = u64::from(self.max.z.abs_diff(self.min.z)) + 1;
        dx.saturating_mul(dy).saturating_mul(dz)
    }
}
