//! Test utilities and mock collaborators for Atlas development.
//!
//! Provides recording implementations of the store's collaborator traits
//! ([`RoomVisitor`], [`RoomFactory`], [`RoomRecipient`], [`RoomDrawer`])
//! and map [`fixtures`] for constructing test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use atlas_core::{Coordinate, RoomFieldVariant, RoomId, TerrainType};
use atlas_store::{Room, RoomDrawer, RoomFactory, RoomRecipient, RoomVisitor};

/// Records every room handed to [`RoomVisitor::visit`], in call order.
#[derive(Default)]
pub struct RecordingVisitor {
    pub rooms: Vec<Arc<Room>>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions of the visited rooms.
    pub fn positions(&self) -> Vec<Coordinate> {
        self.rooms.iter().map(|r| r.position()).collect()
    }

    pub fn ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|r| r.id()).collect()
    }
}

impl RoomVisitor for RecordingVisitor {
    fn visit(&mut self, room: &Arc<Room>) {
        self.rooms.push(Arc::clone(room));
    }
}

/// Collects search results.
#[derive(Default)]
pub struct CollectingRecipient {
    pub rooms: Vec<Arc<Room>>,
}

impl CollectingRecipient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|r| r.id()).collect()
    }
}

impl RoomRecipient for CollectingRecipient {
    fn receive_room(&mut self, room: &Arc<Room>) {
        self.rooms.push(Arc::clone(room));
    }
}

/// Builds named rooms for `fill_area` and counts the calls.
///
/// Each room is named after its position, e.g. `"room 1,0,-2"`, and gets
/// the configured terrain.
pub struct CountingFactory {
    pub calls: usize,
    pub terrain: TerrainType,
}

impl CountingFactory {
    pub fn new(terrain: TerrainType) -> Self {
        Self { calls: 0, terrain }
    }
}

impl Default for CountingFactory {
    fn default() -> Self {
        Self::new(TerrainType::Field)
    }
}

impl RoomFactory for CountingFactory {
    fn create_room(&mut self, position: Coordinate) -> Room {
        self.calls += 1;
        Room::at(position)
            .with_field(RoomFieldVariant::Name(format!(
                "room {},{},{}",
                position.x, position.y, position.z
            )))
            .with_field(RoomFieldVariant::TerrainType(self.terrain))
    }
}

/// One event seen by a [`RecordingDrawer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawEvent {
    Layer(i32),
    Room { id: RoomId, claimed: bool },
    Finish,
}

/// Records the draw protocol as a flat event list.
#[derive(Default)]
pub struct RecordingDrawer {
    pub events: Vec<DrawEvent>,
}

impl RecordingDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the drawn rooms, in draw order.
    pub fn drawn(&self) -> Vec<RoomId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Room { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl RoomDrawer for RecordingDrawer {
    fn begin_layer(&mut self, z: i32) {
        self.events.push(DrawEvent::Layer(z));
    }

    fn draw_room(&mut self, room: &Room, claimed: bool) {
        self.events.push(DrawEvent::Room {
            id: room.id(),
            claimed,
        });
    }

    fn finish(&mut self) {
        self.events.push(DrawEvent::Finish);
    }
}
