//! Free-floating annotations drawn on top of the map.

use atlas_core::Coordinate;
use std::sync::Arc;

/// Shape of an info marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InfoMarkType {
    /// A text label at the first position.
    #[default]
    Text,
    /// A line between the two positions.
    Line,
    /// An arrow from the first position to the second.
    Arrow,
}

/// Category used to style a marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InfoMarkClass {
    /// Uncategorised.
    #[default]
    Generic,
    /// Herb location.
    Herb,
    /// River.
    River,
    /// Named place.
    Place,
    /// Mobile.
    Mob,
    /// Comment.
    Comment,
    /// Road.
    Road,
    /// Object.
    Object,
    /// Action hint.
    Action,
    /// Locality name.
    Locality,
}

/// An annotation anchored at one or two map positions.
///
/// Markers are shared as `Arc<InfoMark>` and removed by identity, so two
/// markers with equal content are still distinct.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoMark {
    /// Marker name.
    pub name: String,
    /// Displayed text.
    pub text: String,
    /// Shape.
    pub kind: InfoMarkType,
    /// Category.
    pub class: InfoMarkClass,
    /// First anchor.
    pub pos1: Coordinate,
    /// Second anchor (ignored for text markers).
    pub pos2: Coordinate,
    /// Rotation in degrees.
    pub rotation_angle: i32,
}

/// Ordered list of shared markers.
#[derive(Clone, Debug, Default)]
pub struct MarkerList {
    markers: Vec<Arc<InfoMark>>,
}

impl MarkerList {
    /// Append a marker.
    pub fn add(&mut self, mark: Arc<InfoMark>) {
        self.markers.push(mark);
    }

    /// Remove the first entry that is the same allocation as `mark`.
    pub fn remove(&mut self, mark: &Arc<InfoMark>) -> bool {
        match self.markers.iter().position(|m| Arc::ptr_eq(m, mark)) {
            Some(pos) => {
                self.markers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// All markers in insertion order.
    pub fn as_slice(&self) -> &[Arc<InfoMark>] {
        &self.markers
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if there are no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Drop every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_is_by_identity() {
        let mut list = MarkerList::default();
        let a = Arc::new(InfoMark::default());
        let b = Arc::new(InfoMark::default());
        list.add(Arc::clone(&a));
        list.add(Arc::clone(&b));
        assert_eq!(*a, *b);
        assert!(list.remove(&b));
        assert_eq!(list.len(), 1);
        assert!(Arc::ptr_eq(&list.as_slice()[0], &a));
        assert!(!list.remove(&b));
    }
}
