//! Strongly-typed identifiers and the [`RoomIdSet`] small set.

use smallvec::SmallVec;
use std::fmt;

/// Stable identifier of a room.
///
/// A room keeps its id for its whole lifetime, even when its coordinate
/// changes. Ids are allocated monotonically by the store and never reused,
/// so a stale id can never alias a newer room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub u32);

impl RoomId {
    /// Sentinel for "no room".
    pub const INVALID: RoomId = RoomId(u32::MAX);

    /// Whether this id may refer to a room.
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}

impl From<u32> for RoomId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identity of something that holds claims on rooms.
///
/// Issued by the store to selections and search recipients. The lock
/// registry maps each room to the set of tokens currently referencing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipientToken(pub u64);

impl fmt::Display for RecipientToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sorted, deduplicated set of room ids.
///
/// Exits almost always connect to zero or one room, so the set is stored
/// inline for up to four members and only spills to the heap beyond that.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoomIdSet {
    ids: SmallVec<[RoomId; 4]>,
}

impl RoomIdSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id. Returns `true` if it was not already present.
    pub fn insert(&mut self, id: RoomId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.ids.insert(pos, id);
                true
            }
        }
    }

    /// Remove an id. Returns `true` if it was present.
    pub fn remove(&mut self, id: RoomId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(pos) => {
                self.ids.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: RoomId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the set has exactly one member.
    pub fn is_unique(&self) -> bool {
        self.ids.len() == 1
    }

    /// Smallest member, if any.
    pub fn first(&self) -> Option<RoomId> {
        self.ids.first().copied()
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Iterate in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<RoomId> for RoomIdSet {
    fn from_iter<I: IntoIterator<Item = RoomId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RoomIdSet {
    type Item = RoomId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, RoomId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_is_default_and_not_valid() {
        assert_eq!(RoomId::default(), RoomId::INVALID);
        assert!(!RoomId::INVALID.is_valid());
        assert!(RoomId(0).is_valid());
        assert_eq!(RoomId::INVALID.to_string(), "invalid");
    }

    #[test]
    fn set_stays_sorted_and_unique() {
        let mut set = RoomIdSet::new();
        assert!(set.insert(RoomId(5)));
        assert!(set.insert(RoomId(1)));
        assert!(!set.insert(RoomId(5)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![RoomId(1), RoomId(5)]);
        assert_eq!(set.first(), Some(RoomId(1)));
        assert!(!set.is_unique());
        assert!(set.remove(RoomId(1)));
        assert!(!set.remove(RoomId(1)));
        assert!(set.is_unique());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_btreeset(ops in proptest::collection::vec((any::<bool>(), 0u32..16), 0..64)) {
                let mut set = RoomIdSet::new();
                let mut model = std::collections::BTreeSet::new();
                for (insert, raw) in ops {
                    let id = RoomId(raw);
                    if insert {
                        prop_assert_eq!(set.insert(id), model.insert(id));
                    } else {
                        prop_assert_eq!(set.remove(id), model.remove(&id));
                    }
                }
                prop_assert_eq!(set.iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
            }
        }
    }
}
