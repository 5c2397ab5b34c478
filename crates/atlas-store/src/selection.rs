//! Caller-held sets of claimed rooms.

use crate::room::Room;
use atlas_core::{RecipientToken, RoomId};
use indexmap::IndexMap;
use std::sync::Arc;

/// A set of rooms a caller holds claims on.
///
/// Issued by [`MapStore::new_selection`](crate::MapStore::new_selection).
/// Every room in the selection is recorded under the selection's token in
/// the store's lock registry. Only the store adds or removes rooms, so the
/// two stay in step. Rooms are kept in insertion order.
///
/// The rooms are snapshots taken when they were last bound. Passing the
/// selection to [`MapStore::execute`](crate::MapStore::execute) refreshes
/// them. Release the claims with
/// [`MapStore::unselect`](crate::MapStore::unselect) once done.
#[derive(Debug)]
pub struct RoomSelection {
    token: RecipientToken,
    rooms: IndexMap<RoomId, Arc<Room>>,
}

impl RoomSelection {
    pub(crate) fn new(token: RecipientToken) -> Self {
        Self {
            token,
            rooms: IndexMap::new(),
        }
    }

    /// The claim token of this selection.
    pub fn token(&self) -> RecipientToken {
        self.token
    }

    /// Number of selected rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// The selected room with this id.
    pub fn get(&self, id: RoomId) -> Option<&Arc<Room>> {
        self.rooms.get(&id)
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.keys().copied()
    }

    /// Selected rooms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Arc<Room>)> + '_ {
        self.rooms.iter().map(|(id, room)| (*id, room))
    }

    pub(crate) fn insert(&mut self, id: RoomId, room: Arc<Room>) {
        self.rooms.insert(id, room);
    }

    pub(crate) fn remove(&mut self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.shift_remove(&id)
    }

    /// Empty the selection and return the ids it held, in order.
    pub(crate) fn take_ids(&mut self) -> Vec<RoomId> {
        self.rooms.drain(..).map(|(id, _)| id).collect()
    }
}
