//! The lock-protected interior of a map store.
//!
//! [`StoreState`] owns the room table, the spatial index, the lock
//! registry, the marker list and the counters. It is only ever reached
//! through the store lock: actions receive `&mut StoreState` while the
//! lock is held, and [`MapStore::with_state`](crate::MapStore::with_state)
//! hands out `&StoreState` for read-only inspection.
//!
//! Every method that adds, moves or removes a room updates the room table
//! and the spatial index together, so a room's own position always equals
//! the key it is indexed under.

use crate::collab::RoomFactory;
use crate::locks::LockRegistry;
use crate::marker::MarkerList;
use crate::metrics::StoreMetrics;
use crate::room::Room;
use crate::room_index::RoomIndex;
use atlas_core::{Coordinate, ExitDirection, RecipientToken, RoomId, StoreError, ALL_EXITS7};
use atlas_space::{nearest_free, SpatialIndex};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// ── Inconsistency ──────────────────────────────────────────────────

/// A broken cross-structure invariant found by
/// [`StoreState::check_consistency`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// A live room is not indexed at its own position.
    Misplaced {
        /// The room.
        id: RoomId,
        /// Where the room thinks it is.
        position: Coordinate,
        /// What the index holds at that position.
        indexed: Option<RoomId>,
    },
    /// The index points at a room that is not live.
    DeadIndexEntry {
        /// The indexed coordinate.
        position: Coordinate,
        /// The dead id.
        id: RoomId,
    },
    /// An exit names a room that is not live.
    DanglingLink {
        /// Room owning the exit.
        from: RoomId,
        /// Direction of the exit.
        dir: ExitDirection,
        /// The dead id.
        to: RoomId,
    },
    /// The lock registry holds claims on a room that is not live.
    DeadLock {
        /// The dead id.
        id: RoomId,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misplaced {
                id,
                position,
                indexed,
            } => match indexed {
                Some(other) => write!(f, "room {id} at {position} is indexed as room {other}"),
                None => write!(f, "room {id} at {position} is not indexed"),
            },
            Self::DeadIndexEntry { position, id } => {
                write!(f, "index entry {position} refers to dead room {id}")
            }
            Self::DanglingLink { from, dir, to } => {
                write!(f, "exit {dir} of room {from} refers to dead room {to}")
            }
            Self::DeadLock { id } => write!(f, "claims recorded on dead room {id}"),
        }
    }
}

// ── StoreState ─────────────────────────────────────────────────────

/// Rooms, index, claims and counters of one store.
#[derive(Debug, Default)]
pub struct StoreState {
    rooms: RoomIndex,
    index: SpatialIndex,
    locks: LockRegistry,
    markers: MarkerList,
    metrics: StoreMetrics,
    next_token: u64,
}

impl StoreState {
    /// An empty state.
    pub fn new() -> Self {
        Self::default()
    }

    // ── read access ────────────────────────────────────────────────

    /// The room table.
    pub fn rooms(&self) -> &RoomIndex {
        &self.rooms
    }

    /// The spatial index.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// The claim registry.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// The marker list.
    pub fn markers(&self) -> &MarkerList {
        &self.markers
    }

    /// The counters.
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    /// Whether `id` refers to a live room.
    pub fn is_live(&self, id: RoomId) -> bool {
        self.rooms.contains(id)
    }

    /// The live room with this id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id).map(|r| &**r)
    }

    /// Shared handle to the live room with this id.
    pub fn shared_room(&self, id: RoomId) -> Option<&Arc<Room>> {
        self.rooms.get(id)
    }

    /// The room at `position`.
    pub fn room_at(&self, position: &Coordinate) -> Option<&Arc<Room>> {
        self.index.get(position).and_then(|id| self.rooms.get(id))
    }

    /// Id of the room at `position`.
    pub fn id_at(&self, position: &Coordinate) -> Option<RoomId> {
        self.index.get(position)
    }

    // ── mutation ───────────────────────────────────────────────────

    /// Mutable access to a live room.
    ///
    /// Position and id cannot be changed through this; use
    /// [`move_room`](Self::move_room).
    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    /// Insert a predefined room at its own position.
    ///
    /// A room carrying [`RoomId::INVALID`] is given a fresh id.
    pub fn insert_room(&mut self, room: Room) -> Result<RoomId, StoreError> {
        let position = room.position();
        if let Some(occupant) = self.index.get(&position) {
            return Err(StoreError::CoordinateOccupied {
                coord: position,
                occupant,
            });
        }
        let id = self.rooms.insert_with_id(room)?;
        self.index.set(position, id);
        self.metrics.rooms_created += 1;
        debug!(room = %id, %position, "inserted room");
        Ok(id)
    }

    /// Insert `template` under a fresh id at the free coordinate nearest to
    /// `near`.
    pub fn place_room_near(
        &mut self,
        mut template: Room,
        near: Coordinate,
    ) -> Result<(RoomId, Coordinate), StoreError> {
        let position = nearest_free(&self.index, near);
        template.set_position(position);
        let id = self.rooms.insert(template)?;
        self.index.set(position, id);
        self.metrics.rooms_created += 1;
        debug!(room = %id, %position, requested = %near, "placed room");
        Ok((id, position))
    }

    /// Create a room through `factory` for every free coordinate of the box
    /// spanned by `a` and `b`. Returns the number created.
    ///
    /// If the id space runs out part way, the rooms created so far stay.
    pub fn fill_area(
        &mut self,
        a: Coordinate,
        b: Coordinate,
        factory: &mut dyn RoomFactory,
    ) -> Result<usize, StoreError> {
        let Self {
            rooms,
            index,
            metrics,
            ..
        } = self;
        let filled = index.try_fill_area(a, b, |position| {
            let mut room = factory.create_room(position);
            room.set_position(position);
            let id = rooms.insert(room)?;
            metrics.rooms_created += 1;
            Ok::<_, StoreError>(id)
        })?;
        debug!(%a, %b, filled, "filled area");
        Ok(filled)
    }

    /// Move a live room to `to`.
    ///
    /// Moving a room onto its own position is a no-op.
    pub fn move_room(&mut self, id: RoomId, to: Coordinate) -> Result<(), StoreError> {
        let from = self
            .room(id)
            .map(Room::position)
            .ok_or(StoreError::UnknownRoom { id })?;
        match self.index.get(&to) {
            Some(occupant) if occupant == id => return Ok(()),
            Some(occupant) => {
                return Err(StoreError::CoordinateOccupied {
                    coord: to,
                    occupant,
                })
            }
            None => {}
        }
        self.index.remove(&from);
        self.index.set(to, id);
        if let Some(room) = self.rooms.get_mut(id) {
            room.set_position(to);
        }
        debug!(room = %id, %from, %to, "moved room");
        Ok(())
    }

    /// Strip every reference to `id` from the exits of its neighbours.
    ///
    /// The room's own exits are left untouched.
    pub fn unlink_room(&mut self, id: RoomId) {
        let Some(neighbours) = self.rooms.get(id).map(|r| r.neighbours()) else {
            return;
        };
        for other in neighbours.iter().filter(|n| *n != id) {
            if let Some(neighbour) = self.rooms.get_mut(other) {
                for dir in ALL_EXITS7 {
                    let exit = neighbour.exit_mut(dir);
                    exit.remove_out(id);
                    exit.remove_in(id);
                }
            }
        }
    }

    /// Remove a room: unlink its neighbours, unbind its position, drop
    /// every claim on it.
    pub fn remove_room(&mut self, id: RoomId) -> Option<Arc<Room>> {
        self.unlink_room(id);
        let room = self.rooms.remove(id)?;
        self.index.remove(&room.position());
        self.locks.forget_room(id);
        self.metrics.rooms_removed += 1;
        debug!(room = %id, position = %room.position(), "removed room");
        Some(room)
    }

    /// Scan for broken cross-structure invariants.
    ///
    /// An empty result means the room table, the index, every exit and the
    /// claim registry agree.
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        let mut found = Vec::new();
        for (id, room) in self.rooms.iter() {
            let indexed = self.index.get(&room.position());
            if indexed != Some(id) {
                found.push(Inconsistency::Misplaced {
                    id,
                    position: room.position(),
                    indexed,
                });
            }
            for (dir, exit) in room.exits() {
                for to in exit.outgoing().iter().chain(exit.incoming().iter()) {
                    if !self.rooms.contains(to) {
                        found.push(Inconsistency::DanglingLink { from: id, dir, to });
                    }
                }
            }
        }
        for (position, id) in self.index.iter() {
            if !self.rooms.contains(id) {
                found.push(Inconsistency::DeadIndexEntry { position, id });
            }
        }
        for id in self.locks.rooms() {
            if !self.rooms.contains(id) {
                found.push(Inconsistency::DeadLock { id });
            }
        }
        found
    }

    // ── claims ─────────────────────────────────────────────────────

    /// Issue a fresh recipient token.
    pub(crate) fn issue_token(&mut self) -> RecipientToken {
        let token = RecipientToken(self.next_token);
        self.next_token += 1;
        token
    }

    pub(crate) fn locks_mut(&mut self) -> &mut LockRegistry {
        &mut self.locks
    }

    pub(crate) fn markers_mut(&mut self) -> &mut MarkerList {
        &mut self.markers
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut StoreMetrics {
        &mut self.metrics
    }

    /// Drop rooms, index, claims and markers. Ids, tokens and counters keep
    /// running.
    pub(crate) fn clear(&mut self) {
        self.rooms.clear();
        self.index.clear();
        self.locks.clear();
        self.markers.clear();
    }
}
