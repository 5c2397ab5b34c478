//! Reusable map fixtures.
//!
//! - [`linked_pair`]: two rooms joined east/west in both directions.
//! - [`corridor`]: a one-way chain of rooms running east from the origin.
//! - [`grid`]: a filled box with every room linked two-way to its north,
//!   east and up neighbours.

use crate::CountingFactory;
use atlas_core::{Coordinate, ExitDirection, RoomId};
use atlas_space::CoordinateBox;
use atlas_store::{AddExit, ExitLinkMode, MapStore, Room};

/// Rooms at the origin and one step east, joined both ways.
///
/// Returns the store, the west room and the east room.
pub fn linked_pair() -> (MapStore, RoomId, RoomId) {
    let store = MapStore::default();
    let west = store
        .insert_room(Room::at(Coordinate::ORIGIN))
        .expect("origin is free");
    let east = store
        .insert_room(Room::at(Coordinate::new(1, 0, 0)))
        .expect("east neighbour is free");
    store
        .schedule(AddExit::new(west, east, ExitDirection::East).with_mode(ExitLinkMode::TwoWay))
        .expect("both rooms are live");
    (store, west, east)
}

/// `len` rooms at `(0..len, 0, 0)`, each with a one-way east exit to the
/// next.
pub fn corridor(len: usize) -> (MapStore, Vec<RoomId>) {
    let store = MapStore::default();
    let ids: Vec<RoomId> = (0..len)
        .map(|x| {
            let x = i32::try_from(x).expect("corridor fits in i32");
            store
                .insert_room(Room::at(Coordinate::new(x, 0, 0)))
                .expect("corridor cell is free")
        })
        .collect();
    for pair in ids.windows(2) {
        store
            .schedule(AddExit::new(pair[0], pair[1], ExitDirection::East))
            .expect("corridor rooms are live");
    }
    (store, ids)
}

/// Fill the box spanned by `a` and `b` and link neighbours both ways.
pub fn grid(a: Coordinate, b: Coordinate) -> MapStore {
    let store = MapStore::default();
    let mut factory = CountingFactory::default();
    store
        .fill_area(a, b, &mut factory)
        .expect("fresh store has ids to spare");

    let bounds = CoordinateBox::new(a, b);
    let ids: Vec<(Coordinate, RoomId)> = store.with_state(|state| state.index().iter().collect());
    for (pos, id) in ids {
        for dir in [ExitDirection::North, ExitDirection::East, ExitDirection::Up] {
            let step = dir.offset();
            let next = Coordinate::new(
                pos.x.saturating_add(step.x),
                pos.y.saturating_add(step.y),
                pos.z.saturating_add(step.z),
            );
            if next == pos || !bounds.contains(&next) {
                continue;
            }
            let Some(to) = store.room_at(next) else {
                continue;
            };
            store
                .schedule(AddExit::new(id, to.id(), dir).with_mode(ExitLinkMode::TwoWay))
                .expect("grid rooms are live");
        }
    }
    store
}
