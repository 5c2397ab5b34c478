//! Collaborator interfaces the store calls back into.
//!
//! Every callback runs while the store lock is held. Implementations must
//! not call back into the same [`MapStore`](crate::MapStore); doing so
//! deadlocks.

use crate::room::Room;
use atlas_core::Coordinate;
use std::sync::Arc;

/// Receives rooms streamed out of a range query.
pub trait RoomVisitor {
    /// Called once per room in range.
    fn visit(&mut self, room: &Arc<Room>);
}

impl<F: FnMut(&Arc<Room>)> RoomVisitor for F {
    fn visit(&mut self, room: &Arc<Room>) {
        self(room)
    }
}

/// Materialises rooms for [`MapStore::fill_area`](crate::MapStore::fill_area).
pub trait RoomFactory {
    /// Build the template for a room that will live at `position`.
    ///
    /// The store overwrites the template's id and position.
    fn create_room(&mut self, position: Coordinate) -> Room;
}

impl<F: FnMut(Coordinate) -> Room> RoomFactory for F {
    fn create_room(&mut self, position: Coordinate) -> Room {
        self(position)
    }
}

/// Receives the matches of a generic search.
pub trait RoomRecipient {
    /// Called once per matching room, after the claim has been recorded.
    fn receive_room(&mut self, room: &Arc<Room>);
}

impl<F: FnMut(&Arc<Room>)> RoomRecipient for F {
    fn receive_room(&mut self, room: &Arc<Room>) {
        self(room)
    }
}

/// Predicate selecting rooms for a generic search.
pub trait RoomFilter {
    /// Whether `room` matches.
    fn filter(&self, room: &Room) -> bool;
}

impl<F: Fn(&Room) -> bool> RoomFilter for F {
    fn filter(&self, room: &Room) -> bool {
        self(room)
    }
}

/// Rendering surface fed by [`MapStore::draw`](crate::MapStore::draw).
///
/// Rooms arrive grouped by layer, layers in ascending `z`.
pub trait RoomDrawer {
    /// A new layer starts.
    fn begin_layer(&mut self, _z: i32) {}

    /// Draw one room. `claimed` is `true` if any recipient holds a claim on it.
    fn draw_room(&mut self, room: &Room, claimed: bool);

    /// All layers have been delivered.
    fn finish(&mut self) {}
}
