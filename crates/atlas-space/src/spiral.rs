//! Deterministic outward search for a free coordinate.
//!
//! [`CoordinateIterator`] yields an endless sequence of offsets that
//! starts at the origin and visits every sign combination of a growing
//! shell. [`nearest_free`] adds (or subtracts) those offsets to a
//! requested position until it lands on an unoccupied coordinate.
//!
//! The sequence is part of the observable behaviour: a map rebuilt from the
//! same inputs must place every room at the same spot, so it must never be
//! reordered.

use crate::index::SpatialIndex;
use atlas_core::Coordinate;

/// Endless generator of search offsets.
///
/// Cycles through nine states. States `0..=7` reflect the current offset
/// through the eight sign combinations of its axes; state `8` advances the
/// offset to the next point of the current shell, growing the shell once
/// `x` passes the threshold. The threshold starts at zero, so the first
/// two passes emit only the origin.
///
/// # Examples
///
/// ```
/// use atlas_core::Coordinate;
/// use atlas_space::CoordinateIterator;
///
/// let offsets: Vec<_> = CoordinateIterator::new().take(19).collect();
/// assert!(offsets[..17].iter().all(|c| *c == Coordinate::ORIGIN));
/// assert_eq!(offsets[17], Coordinate::new(0, 0, 1));
/// assert_eq!(offsets[18], Coordinate::new(0, 0, -1));
/// ```
#[derive(Clone, Debug)]
pub struct CoordinateIterator {
    current: Coordinate,
    threshold: i32,
    state: u8,
}

impl CoordinateIterator {
    /// Start a fresh sequence at the origin.
    pub fn new() -> Self {
        Self {
            current: Coordinate::ORIGIN,
            threshold: 0,
            state: 0,
        }
    }

    /// Produce the next offset.
    pub fn next_offset(&mut self) -> Coordinate {
        let c = &mut self.current;
        match self.state {
            0 => {
                c.x = -c.x;
                c.y = -c.y;
                c.z = -c.z;
            }
            1 => c.z = -c.z,
            2 => {
                c.y = -c.y;
                c.z = -c.z;
            }
            3 => {
                c.x = -c.x;
                c.y = -c.y;
            }
            4 => c.y = -c.y,
            5 => {
                c.y = -c.y;
                c.z = -c.z;
            }
            6 => {
                c.x = -c.x;
                c.y = -c.y;
            }
            7 => c.x = -c.x,
            _ => {
                if c.z < self.threshold {
                    c.z += 1;
                } else {
                    c.z = 0;
                    if c.y < self.threshold {
                        c.y += 1;
                    } else {
                        c.y = 0;
                        if c.x >= self.threshold {
                            self.threshold += 1;
                            c.x = 0;
                        } else {
                            c.x += 1;
                        }
                    }
                }
            }
        }
        self.state = if self.state >= 8 { 0 } else { self.state + 1 };
        self.current
    }
}

impl Default for CoordinateIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for CoordinateIterator {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        Some(self.next_offset())
    }
}

/// The first coordinate near `origin` that `index` leaves unoccupied.
///
/// The search direction depends on the parity of the component sum of
/// `origin`: when `sum / 2 == (sum + 1) / 2` (truncating division) offsets
/// are added, otherwise they are subtracted. An unoccupied `origin` is
/// returned as-is.
///
/// Candidates that would overflow `i32` are skipped. Termination relies on
/// the index being finite, which it always is.
pub fn nearest_free(index: &SpatialIndex, origin: Coordinate) -> Coordinate {
    let sum = origin.component_sum();
    let forward = sum / 2 == (sum + 1) / 2;
    let mut offsets = CoordinateIterator::new();
    loop {
        let offset = offsets.next_offset();
        let candidate = if forward {
            checked_add(origin, offset)
        } else {
            checked_sub(origin, offset)
        };
        if let Some(c) = candidate {
            if !index.defined(&c) {
                return c;
            }
        }
    }
}

fn checked_add(a: Coordinate, b: Coordinate) -> Option<Coordinate> {
    Some(Coordinate::new(
        a.x.checked_add(b.x)?,
        a.y.checked_add(b.y)?,
        a.z.checked_add(b.z)?,
    ))
}

fn checked_sub(a: Coordinate, b: Coordinate) -> Option<Coordinate> {
    Some(Coordinate::new(
        a.x.checked_sub(b.x)?,
        a.y.checked_sub(b.y)?,
        a.z.checked_sub(b.z)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::RoomId;
    use std::collections::HashSet;

    fn c(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z)
    }

    fn fill_cube(index: &mut SpatialIndex, radius: i32) {
        let mut next = 0;
        index.fill_area(c(-radius, -radius, -radius), c(radius, radius, radius), |_| {
            next += 1;
            RoomId(next)
        });
    }

    #[test]
    fn opening_offsets() {
        let offsets: Vec<_> = CoordinateIterator::new().take(27).collect();
        assert!(offsets[..17].iter().all(|o| *o == Coordinate::ORIGIN));
        // The first expansion, then its eight reflections.
        let expected = [
            c(0, 0, 1),
            c(0, 0, -1),
            c(0, 0, 1),
            c(0, 0, -1),
            c(0, 0, -1),
            c(0, 0, -1),
            c(0, 0, 1),
            c(0, 0, 1),
            c(0, 0, 1),
        ];
        assert_eq!(offsets[17..26], expected);
        assert_eq!(offsets[26], c(0, 1, 0));
    }

    #[test]
    fn eventually_covers_the_inner_cube() {
        let seen: HashSet<_> = CoordinateIterator::new().take(4000).collect();
        for x in -3..=3 {
            for y in -3..=3 {
                for z in -3..=3 {
                    assert!(seen.contains(&c(x, y, z)), "missing {}", c(x, y, z));
                }
            }
        }
    }

    #[test]
    fn free_origin_is_returned() {
        let index = SpatialIndex::new();
        assert_eq!(nearest_free(&index, Coordinate::ORIGIN), Coordinate::ORIGIN);
    }

    #[test]
    fn occupied_origin_moves_up() {
        let mut index = SpatialIndex::new();
        index.set(Coordinate::ORIGIN, RoomId(0));
        assert_eq!(nearest_free(&index, Coordinate::ORIGIN), c(0, 0, 1));
        index.set(c(0, 0, 1), RoomId(1));
        assert_eq!(nearest_free(&index, Coordinate::ORIGIN), c(0, 0, -1));
    }

    #[test]
    fn odd_sum_searches_backwards() {
        let mut index = SpatialIndex::new();
        index.set(c(1, 0, 0), RoomId(0));
        assert_eq!(nearest_free(&index, c(1, 0, 0)), c(1, 0, -1));
    }

    #[test]
    fn full_cubes_push_outward() {
        let mut index = SpatialIndex::new();
        fill_cube(&mut index, 1);
        assert_eq!(nearest_free(&index, Coordinate::ORIGIN), c(0, 0, 2));

        let mut index = SpatialIndex::new();
        fill_cube(&mut index, 2);
        assert_eq!(nearest_free(&index, Coordinate::ORIGIN), c(0, 0, 3));
    }

    #[test]
    fn overflowing_candidates_are_skipped() {
        let mut index = SpatialIndex::new();
        let corner = c(i32::MAX, i32::MAX, i32::MAX);
        index.set(corner, RoomId(0));
        let free = nearest_free(&index, corner);
        assert_ne!(free, corner);
        assert!(!index.defined(&free));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn result_is_free_and_close(
                occupied in proptest::collection::vec((-2i32..3, -2i32..3, -2i32..3), 0..60),
                origin in (-2i32..3, -2i32..3, -2i32..3),
            ) {
                let mut index = SpatialIndex::new();
                for (i, (x, y, z)) in occupied.into_iter().enumerate() {
                    index.set(Coordinate::new(x, y, z), RoomId(i as u32));
                }
                let origin = Coordinate::from(origin);
                let free = nearest_free(&index, origin);
                prop_assert!(!index.defined(&free));
                prop_assert!(free.chebyshev_distance(&origin) <= 5);
            }
        }
    }
}
