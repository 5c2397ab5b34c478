//! Random operation sequences never break the store's cross-structure
//! invariants, and selections never hold dead rooms after `execute`.

use std::sync::Arc;
use std::thread;

use atlas_core::{Coordinate, ExitDirection, RoomId, ALL_EXITS_NESWUD};
use atlas_store::{
    AddExit, ExitLinkMode, MapStore, RemoveExit, Room, RoomMutation, RoomSelection,
    SingleRoomAction,
};
use atlas_test_utils::CollectingRecipient;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Create(Coordinate),
    Remove(usize),
    Link(usize, usize, ExitDirection, ExitLinkMode),
    Unlink(usize, usize, ExitDirection, ExitLinkMode),
    Move(usize, Coordinate),
    Select(usize),
    Search,
    RemoveViaSelection(usize),
}

fn arb_coord() -> impl Strategy<Value = Coordinate> {
    (-3i32..=3, -3i32..=3, -1i32..=1).prop_map(|(x, y, z)| Coordinate::new(x, y, z))
}

fn arb_dir() -> impl Strategy<Value = ExitDirection> {
    (0usize..6).prop_map(|i| ALL_EXITS_NESWUD[i])
}

fn arb_mode() -> impl Strategy<Value = ExitLinkMode> {
    prop_oneof![Just(ExitLinkMode::OneWay), Just(ExitLinkMode::TwoWay)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_coord().prop_map(Op::Create),
        1 => any::<usize>().prop_map(Op::Remove),
        3 => (any::<usize>(), any::<usize>(), arb_dir(), arb_mode())
            .prop_map(|(a, b, d, m)| Op::Link(a, b, d, m)),
        1 => (any::<usize>(), any::<usize>(), arb_dir(), arb_mode())
            .prop_map(|(a, b, d, m)| Op::Unlink(a, b, d, m)),
        1 => (any::<usize>(), arb_coord()).prop_map(|(i, c)| Op::Move(i, c)),
        1 => any::<usize>().prop_map(Op::Select),
        1 => Just(Op::Search),
        1 => any::<usize>().prop_map(Op::RemoveViaSelection),
    ]
}

/// Pick a known id. Dead ids stay in the pool on purpose.
fn pick(ids: &[RoomId], i: usize) -> Option<RoomId> {
    (!ids.is_empty()).then(|| ids[i % ids.len()])
}

fn apply(store: &MapStore, ids: &mut Vec<RoomId>, sel: &mut RoomSelection, op: Op) {
    match op {
        Op::Create(near) => ids.push(store.create_room(Room::default(), near).unwrap().0),
        Op::Remove(i) => {
            if let Some(id) = pick(ids, i) {
                let _ = store.schedule(SingleRoomAction::new(id, RoomMutation::Remove));
            }
        }
        Op::Link(a, b, dir, mode) => {
            if let (Some(a), Some(b)) = (pick(ids, a), pick(ids, b)) {
                let _ = store.schedule(AddExit::new(a, b, dir).with_mode(mode));
            }
        }
        Op::Unlink(a, b, dir, mode) => {
            if let (Some(a), Some(b)) = (pick(ids, a), pick(ids, b)) {
                let _ = store.schedule(RemoveExit::new(a, b, dir).with_mode(mode));
            }
        }
        Op::Move(i, to) => {
            if let Some(id) = pick(ids, i) {
                let _ = store.move_room(id, to);
            }
        }
        Op::Select(i) => {
            if let Some(id) = pick(ids, i) {
                store.select_room(id, sel);
            }
        }
        Op::Search => {
            let token = store.register_recipient();
            let mut recipient = CollectingRecipient::new();
            store.generic_search(token, &mut recipient, &|room: &Room| room.position().z == 0);
            store.release_recipient(token);
        }
        Op::RemoveViaSelection(i) => {
            if let Some(id) = pick(ids, i) {
                let _ = store.execute(SingleRoomAction::new(id, RoomMutation::Remove), sel);
            }
        }
    }
}

proptest! {
    #[test]
    fn random_operations_stay_consistent(ops in prop::collection::vec(arb_op(), 1..60)) {
        let store = MapStore::default();
        let mut ids = Vec::new();
        let mut sel = store.new_selection();
        for op in ops {
            apply(&store, &mut ids, &mut sel, op);
            let problems = store.check_consistency();
            prop_assert!(problems.is_empty(), "{:?}", problems);
        }

        // One last pass through the store re-synchronises the selection.
        if let Some(&id) = ids.first() {
            let _ = store.execute(SingleRoomAction::new(id, RoomMutation::MakePermanent), &mut sel);
        }
        for (id, room) in sel.iter() {
            let live = store.room(id);
            prop_assert!(live.is_some(), "selection holds dead room {}", id);
            prop_assert_eq!(live.unwrap().position(), room.position());
            prop_assert!(store.holders(id).contains(&sel.token()));
        }
    }
}

#[test]
fn concurrent_writers_keep_the_store_consistent() {
    let store = Arc::new(MapStore::default());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut sel = store.new_selection();
                let mut last = None;
                for i in 0..50 {
                    let (id, _) = store
                        .create_room(Room::default(), Coordinate::new(t * 10, 0, 0))
                        .unwrap();
                    store.select_room(id, &mut sel);
                    if let Some(prev) = last {
                        let _ = store.execute(
                            AddExit::new(prev, id, ExitDirection::East)
                                .with_mode(ExitLinkMode::TwoWay),
                            &mut sel,
                        );
                    }
                    if i % 7 == 6 {
                        let _ = store.execute(SingleRoomAction::new(id, RoomMutation::Remove), &mut sel);
                        last = None;
                    } else {
                        last = Some(id);
                    }
                }
                sel.len()
            })
        })
        .collect();

    let held: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let removed = 4 * (50 / 7);
    assert_eq!(store.len(), 4 * 50 - removed);
    assert_eq!(held, store.len());
    assert!(store.check_consistency().is_empty());
}
