//! The sparse `z → y → x` coordinate index.
//!
//! [`SpatialIndex`] holds a non-owning back-reference (a [`RoomId`]) for
//! every occupied coordinate. Rooms themselves live in the store's room
//! table; keeping both sides consistent is the caller's job and is done
//! under the store lock.

use crate::bounds::CoordinateBox;
use atlas_core::{Coordinate, RoomId};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::ops::Bound;

type Row = BTreeMap<i32, RoomId>;
type Layer = BTreeMap<i32, Row>;

/// Sparse ordered mapping from coordinates to room ids.
///
/// Iteration order is `z` outermost, then `y`, then `x`, each ascending.
///
/// # Examples
///
/// ```
/// use atlas_core::{Coordinate, RoomId};
/// use atlas_space::SpatialIndex;
///
/// let mut index = SpatialIndex::new();
/// let c = Coordinate::new(4, -2, 0);
/// index.set(c, RoomId(9));
/// assert!(index.defined(&c));
/// assert_eq!(index.get(&c), Some(RoomId(9)));
/// assert_eq!(index.remove(&c), Some(RoomId(9)));
/// assert!(!index.defined(&c));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpatialIndex {
    layers: BTreeMap<i32, Layer>,
    len: usize,
}

impl SpatialIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied coordinates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no coordinate is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every binding.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.len = 0;
    }

    /// Whether a room is bound at `c`.
    pub fn defined(&self, c: &Coordinate) -> bool {
        self.get(c).is_some()
    }

    /// The room bound at `c`, if any.
    pub fn get(&self, c: &Coordinate) -> Option<RoomId> {
        self.layers.get(&c.z)?.get(&c.y)?.get(&c.x).copied()
    }

    /// Bind `id` at `c`, returning the id previously bound there.
    pub fn set(&mut self, c: Coordinate, id: RoomId) -> Option<RoomId> {
        let previous = self
            .layers
            .entry(c.z)
            .or_default()
            .entry(c.y)
            .or_default()
            .insert(c.x, id);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Unbind `c`, returning the id that was bound there.
    ///
    /// Rows and layers left empty are pruned so the index never accumulates
    /// dead branches.
    pub fn remove(&mut self, c: &Coordinate) -> Option<RoomId> {
        let layer = self.layers.get_mut(&c.z)?;
        let row = layer.get_mut(&c.y)?;
        let removed = row.remove(&c.x)?;
        if row.is_empty() {
            layer.remove(&c.y);
            if layer.is_empty() {
                self.layers.remove(&c.z);
            }
        }
        self.len -= 1;
        Some(removed)
    }

    /// Visit every room whose coordinate lies in the box spanned by `a`
    /// and `b`.
    ///
    /// The box is first expanded by one unit on every axis and keys are then
    /// selected strictly inside the expanded box. The net selection is the
    /// closed box `[min, max]`: a room exactly on a corner is visited, a room
    /// one unit outside is not.
    pub fn rooms_in(&self, a: Coordinate, b: Coordinate, mut visit: impl FnMut(Coordinate, RoomId)) {
        let range = CoordinateBox::new(a, b);
        let outer = range.expanded(Coordinate::new(1, 1, 1));
        let (lo, hi) = (range.min, range.max);
        let zs = strictly_inside(outer.min.z, outer.max.z, lo.z, hi.z);
        let ys = strictly_inside(outer.min.y, outer.max.y, lo.y, hi.y);
        let xs = strictly_inside(outer.min.x, outer.max.x, lo.x, hi.x);
        for (&z, layer) in self.layers.range(zs) {
            for (&y, row) in layer.range(ys) {
                for (&x, &id) in row.range(xs) {
                    visit(Coordinate::new(x, y, z), id);
                }
            }
        }
    }

    /// Collect the ids [`rooms_in`](Self::rooms_in) would visit.
    pub fn collect_in(&self, a: Coordinate, b: Coordinate) -> Vec<RoomId> {
        let mut out = Vec::new();
        self.rooms_in(a, b, |_, id| out.push(id));
        out
    }

    /// For every coordinate of the closed box spanned by `a` and `b` that is
    /// not yet defined, bind the id returned by `make(c)`.
    ///
    /// Returns the number of coordinates filled.
    pub fn fill_area(
        &mut self,
        a: Coordinate,
        b: Coordinate,
        mut make: impl FnMut(Coordinate) -> RoomId,
    ) -> usize {
        match self.try_fill_area(a, b, |c| Ok::<_, Infallible>(make(c))) {
            Ok(filled) => filled,
            Err(never) => match never {},
        }
    }

    /// Like [`fill_area`](Self::fill_area), but stops at the first error
    /// from `make`. Coordinates filled before the error stay bound.
    pub fn try_fill_area<E>(
        &mut self,
        a: Coordinate,
        b: Coordinate,
        mut make: impl FnMut(Coordinate) -> Result<RoomId, E>,
    ) -> Result<usize, E> {
        let range = CoordinateBox::new(a, b);
        let mut filled = 0;
        for z in range.min.z..=range.max.z {
            for y in range.min.y..=range.max.y {
                for x in range.min.x..=range.max.x {
                    let c = Coordinate::new(x, y, z);
                    if !self.defined(&c) {
                        let id = make(c)?;
                        self.set(c, id);
                        filled += 1;
                    }
                }
            }
        }
        Ok(filled)
    }

    /// Iterate over every binding in `z`, `y`, `x` order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, RoomId)> + '_ {
        self.layers.iter().flat_map(|(&z, layer)| {
            layer.iter().flat_map(move |(&y, row)| {
                row.iter()
                    .map(move |(&x, &id)| (Coordinate::new(x, y, z), id))
            })
        })
    }
}

/// Exclusive bounds on the expanded edges `outer_min`/`outer_max`.
///
/// An edge that saturated at the `i32` limit did not move, so it is kept
/// inclusive instead.
fn strictly_inside(
    outer_min: i32,
    outer_max: i32,
    min: i32,
    max: i32,
) -> (Bound<i32>, Bound<i32>) {
    let lower = if outer_min < min {
        Bound::Excluded(outer_min)
    } else {
        Bound::Included(min)
    };
    let upper = if outer_max > max {
        Bound::Excluded(outer_max)
    } else {
        Bound::Included(max)
    };
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z)
    }

    #[test]
    fn set_replaces_and_reports_previous() {
        let mut index = SpatialIndex::new();
        assert_eq!(index.set(c(0, 0, 0), RoomId(1)), None);
        assert_eq!(index.set(c(0, 0, 0), RoomId(2)), Some(RoomId(1)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&c(0, 0, 0)), Some(RoomId(2)));
    }

    #[test]
    fn remove_prunes_empty_branches() {
        let mut index = SpatialIndex::new();
        index.set(c(1, 2, 3), RoomId(1));
        index.remove(&c(1, 2, 3));
        assert!(index.is_empty());
        assert!(index.layers.is_empty());
        assert_eq!(index.remove(&c(1, 2, 3)), None);
    }

    #[test]
    fn range_is_the_closed_box() {
        let mut index = SpatialIndex::new();
        index.set(c(0, 0, 0), RoomId(0));
        index.set(c(2, 2, 2), RoomId(1));
        index.set(c(3, 2, 2), RoomId(2));
        index.set(c(-1, 0, 0), RoomId(3));
        let ids = index.collect_in(c(0, 0, 0), c(2, 2, 2));
        assert_eq!(ids, vec![RoomId(0), RoomId(1)]);
    }

    #[test]
    fn range_accepts_corners_in_any_order() {
        let mut index = SpatialIndex::new();
        index.set(c(1, 1, 1), RoomId(7));
        assert_eq!(index.collect_in(c(2, 2, 2), c(0, 0, 0)), vec![RoomId(7)]);
    }

    #[test]
    fn range_at_integer_limits() {
        let mut index = SpatialIndex::new();
        index.set(c(i32::MIN, 0, 0), RoomId(0));
        index.set(c(i32::MAX, 0, 0), RoomId(1));
        let ids = index.collect_in(c(i32::MIN, 0, 0), c(i32::MAX, 0, 0));
        assert_eq!(ids, vec![RoomId(0), RoomId(1)]);
    }

    #[test]
    fn range_visits_z_then_y_then_x() {
        let mut index = SpatialIndex::new();
        index.set(c(1, 0, 1), RoomId(3));
        index.set(c(0, 1, 0), RoomId(2));
        index.set(c(1, 0, 0), RoomId(1));
        index.set(c(0, 0, 0), RoomId(0));
        let ids = index.collect_in(c(0, 0, 0), c(1, 1, 1));
        assert_eq!(ids, vec![RoomId(0), RoomId(1), RoomId(2), RoomId(3)]);
    }

    #[test]
    fn fill_area_only_fills_gaps() {
        let mut index = SpatialIndex::new();
        index.set(c(0, 0, 0), RoomId(100));
        let mut next = 0;
        let filled = index.fill_area(c(0, 0, 0), c(1, 1, 0), |_| {
            next += 1;
            RoomId(next)
        });
        assert_eq!(filled, 3);
        assert_eq!(index.len(), 4);
        assert_eq!(index.get(&c(0, 0, 0)), Some(RoomId(100)));
    }

    #[test]
    fn try_fill_area_keeps_rooms_made_before_an_error() {
        let mut index = SpatialIndex::new();
        let mut budget = 2u32;
        let result = index.try_fill_area(c(0, 0, 0), c(3, 0, 0), |_| {
            if budget == 0 {
                return Err("out of ids");
            }
            budget -= 1;
            Ok(RoomId(budget))
        });
        assert_eq!(result, Err("out of ids"));
        assert_eq!(index.len(), 2);
        assert!(index.defined(&c(1, 0, 0)));
        assert!(!index.defined(&c(2, 0, 0)));
    }

    #[test]
    fn iter_matches_len() {
        let mut index = SpatialIndex::new();
        index.set(c(5, 5, 5), RoomId(1));
        index.set(c(-5, 5, 5), RoomId(2));
        index.set(c(0, 0, -3), RoomId(3));
        let all: Vec<_> = index.iter().collect();
        assert_eq!(all.len(), index.len());
        assert_eq!(all[0], (c(0, 0, -3), RoomId(3)));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn coord() -> impl Strategy<Value = Coordinate> {
            (-8i32..8, -8i32..8, -8i32..8).prop_map(|(x, y, z)| Coordinate::new(x, y, z))
        }

        proptest! {
            #[test]
            fn set_then_get(cs in proptest::collection::vec(coord(), 1..40)) {
                let mut index = SpatialIndex::new();
                for (i, c) in cs.iter().enumerate() {
                    index.set(*c, RoomId(i as u32));
                    prop_assert_eq!(index.get(c), Some(RoomId(i as u32)));
                    prop_assert!(index.defined(c));
                }
                let distinct: std::collections::HashSet<_> = cs.iter().collect();
                prop_assert_eq!(index.len(), distinct.len());
                for c in &cs {
                    index.remove(c);
                    prop_assert!(!index.defined(c));
                }
                prop_assert!(index.is_empty());
            }

            #[test]
            fn range_matches_box_filter(
                cs in proptest::collection::vec(coord(), 0..40),
                a in coord(),
                b in coord(),
            ) {
                let mut index = SpatialIndex::new();
                for (i, c) in cs.iter().enumerate() {
                    index.set(*c, RoomId(i as u32));
                }
                let bx = CoordinateBox::new(a, b);
                let mut visited = Vec::new();
                index.rooms_in(a, b, |c, _| visited.push(c));
                let expected: Vec<_> = index.iter().map(|(c, _)| c).filter(|c| bx.contains(c)).collect();
                prop_assert_eq!(visited, expected);
            }
        }
    }
}
