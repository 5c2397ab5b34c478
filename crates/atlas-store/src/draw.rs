//! Layered hand-off of rooms to a [`RoomDrawer`].

use crate::collab::RoomDrawer;
use crate::room::Room;
use crate::state::StoreState;
use atlas_core::RoomId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Collects the rooms of a range query into `z` layers, then replays them
/// to a drawer, lowest layer first.
#[derive(Debug, Default)]
pub struct DrawStream {
    layers: BTreeMap<i32, Vec<(Arc<Room>, bool)>>,
}

impl DrawStream {
    /// An empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue room `id` if it is live.
    pub fn visit(&mut self, state: &StoreState, id: RoomId) {
        if let Some(room) = state.shared_room(id) {
            let claimed = state.locks().is_locked(id);
            self.layers
                .entry(room.position().z)
                .or_default()
                .push((Arc::clone(room), claimed));
        }
    }

    /// Number of queued rooms.
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Replay every queued room to `drawer`.
    pub fn draw(self, drawer: &mut dyn RoomDrawer) {
        for (z, rooms) in self.layers {
            drawer.begin_layer(z);
            for (room, claimed) in rooms {
                drawer.draw_room(&room, claimed);
            }
        }
        drawer.finish();
    }
}
