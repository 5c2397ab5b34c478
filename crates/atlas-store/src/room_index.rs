//! The owning room table.
//!
//! [`RoomIndex`] owns every live room, keyed by [`RoomId`]. Rooms are held
//! as `Arc<Room>` and mutated copy-on-write, so a room handed out to a
//! caller is a stable snapshot: later mutations produce a new allocation
//! and never show through an `Arc` the caller already holds.

use crate::room::Room;
use atlas_core::{RoomId, StoreError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Arena of live rooms keyed by id.
///
/// Ids are allocated monotonically and never reused, not even after
/// [`clear`](Self::clear).
#[derive(Clone, Debug, Default)]
pub struct RoomIndex {
    rooms: BTreeMap<RoomId, Arc<Room>>,
    next_id: u32,
}

impl RoomIndex {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if there are no live rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Whether `id` is live.
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// The id the next allocation will receive.
    pub fn next_id(&self) -> RoomId {
        RoomId(self.next_id)
    }

    /// Insert a room under a freshly allocated id, overwriting whatever id
    /// the room carried.
    ///
    /// Fails with [`StoreError::IdSpaceExhausted`] once the counter has
    /// reached [`RoomId::INVALID`].
    pub fn insert(&mut self, mut room: Room) -> Result<RoomId, StoreError> {
        let id = RoomId(self.next_id);
        if !id.is_valid() {
            return Err(StoreError::IdSpaceExhausted);
        }
        self.next_id += 1;
        room.set_id(id);
        self.rooms.insert(id, Arc::new(room));
        Ok(id)
    }

    /// Insert a room under the id it already carries.
    ///
    /// A room carrying [`RoomId::INVALID`] is given a fresh id instead. The
    /// allocation counter is advanced past explicit ids so they are never
    /// handed out again.
    pub fn insert_with_id(&mut self, room: Room) -> Result<RoomId, StoreError> {
        let id = room.id();
        if !id.is_valid() {
            return self.insert(room);
        }
        if self.contains(id) {
            return Err(StoreError::RoomIdInUse { id });
        }
        // A valid id is below `u32::MAX`, so this cannot overflow.
        self.next_id = self.next_id.max(id.0 + 1);
        self.rooms.insert(id, Arc::new(room));
        Ok(id)
    }

    /// Shared handle to a live room.
    pub fn get(&self, id: RoomId) -> Option<&Arc<Room>> {
        self.rooms.get(&id)
    }

    /// Mutable access to a live room, detaching it from any outstanding
    /// shared handle first.
    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id).map(Arc::make_mut)
    }

    /// Remove a room from the table.
    pub fn remove(&mut self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.remove(&id)
    }

    /// Iterate live rooms in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Arc<Room>)> + '_ {
        self.rooms.iter().map(|(id, room)| (*id, room))
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.keys().copied()
    }

    /// Drop every room. The id counter keeps running.
    pub fn clear(&mut self) {
        self.rooms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::{Coordinate, RoomFieldVariant};

    #[test]
    fn ids_are_monotonic_across_clear() {
        let mut index = RoomIndex::new();
        let a = index.insert(Room::default()).unwrap();
        let b = index.insert(Room::default()).unwrap();
        assert_eq!((a, b), (RoomId(0), RoomId(1)));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.insert(Room::default()), Ok(RoomId(2)));
    }

    #[test]
    fn insert_stamps_the_id() {
        let mut index = RoomIndex::new();
        let id = index.insert(Room::default().with_id(RoomId(40))).unwrap();
        assert_eq!(id, RoomId(0));
        assert_eq!(index.get(id).map(|r| r.id()), Some(id));
    }

    #[test]
    fn explicit_ids_advance_the_counter() {
        let mut index = RoomIndex::new();
        let room = Room::at(Coordinate::ORIGIN).with_id(RoomId(10));
        assert_eq!(index.insert_with_id(room.clone()), Ok(RoomId(10)));
        assert_eq!(
            index.insert_with_id(room),
            Err(StoreError::RoomIdInUse { id: RoomId(10) })
        );
        assert_eq!(index.next_id(), RoomId(11));
        assert_eq!(index.insert_with_id(Room::default()), Ok(RoomId(11)));
    }

    #[test]
    fn allocation_fails_cleanly_after_the_last_id() {
        let mut index = RoomIndex::new();
        let last = Room::default().with_id(RoomId(u32::MAX - 1));
        assert_eq!(index.insert_with_id(last), Ok(RoomId(u32::MAX - 1)));
        assert_eq!(index.next_id(), RoomId::INVALID);
        assert_eq!(
            index.insert(Room::default()),
            Err(StoreError::IdSpaceExhausted)
        );
        assert_eq!(
            index.insert_with_id(Room::default()),
            Err(StoreError::IdSpaceExhausted)
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn mutation_does_not_leak_into_snapshots() {
        let mut index = RoomIndex::new();
        let id = index.insert(Room::default()).unwrap();
        let snapshot = Arc::clone(index.get(id).unwrap());
        index
            .get_mut(id)
            .unwrap()
            .apply_field(RoomFieldVariant::Name("changed".into()));
        assert_eq!(snapshot.name(), "");
        assert_eq!(index.get(id).unwrap().name(), "changed");
    }
}
