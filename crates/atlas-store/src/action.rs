//! One-shot mutations of the map.
//!
//! All room mutation goes through [`MapAction`]. An action names its target
//! rooms up front so the store can check that they are still live before
//! anything changes, reports the rooms whose content it will change, and
//! then runs exactly once against the lock-protected [`StoreState`].
//!
//! Most edits touch a single room and are expressed as a [`RoomMutation`]
//! wrapped in a [`SingleRoomAction`]. Graph edits that touch two rooms are
//! [`AddExit`] and [`RemoveExit`].

use crate::state::StoreState;
use atlas_core::{
    ExitDirection, ExitDirections, ExitFieldVariant, FlagModifyMode, LightType, RoomFieldVariant,
    RoomId, TerrainType, ALL_EXITS_NESWUD,
};
use smallvec::{smallvec, SmallVec};
use std::collections::BTreeSet;
use std::fmt;

/// Target list of an action. Almost always one or two rooms.
pub type ActionTargets = SmallVec<[RoomId; 2]>;

// ── MapAction ──────────────────────────────────────────────────────

/// A mutation of the map, executed at most once.
///
/// # Contract
///
/// - [`targets`](Self::targets) lists every room the action requires to be
///   live. If any is missing the store rejects the action without calling
///   [`exec`](Self::exec).
/// - [`affected_rooms`](Self::affected_rooms) is computed before `exec` and
///   lists every room whose content will change.
/// - `exec` must leave the room table and the spatial index consistent;
///   use the [`StoreState`] mutation API, which keeps both in step.
pub trait MapAction: fmt::Debug {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Rooms that must be live for the action to run.
    fn targets(&self) -> ActionTargets;

    /// Rooms whose content the action will change.
    fn affected_rooms(&self, _state: &StoreState) -> BTreeSet<RoomId> {
        self.targets().into_iter().collect()
    }

    /// Apply the mutation.
    fn exec(&mut self, state: &mut StoreState);
}

impl<A: MapAction + ?Sized> MapAction for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn targets(&self) -> ActionTargets {
        (**self).targets()
    }

    fn affected_rooms(&self, state: &StoreState) -> BTreeSet<RoomId> {
        (**self).affected_rooms(state)
    }

    fn exec(&mut self, state: &mut StoreState) {
        (**self).exec(state)
    }
}

/// Outcome of a successfully executed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionReport {
    /// Name of the action.
    pub action: String,
    /// Rooms whose content changed.
    pub affected: BTreeSet<RoomId>,
}

// ── RoomUpdate ─────────────────────────────────────────────────────

/// A partial set of observed room properties.
///
/// Applying an update overwrites the fields that are `Some`, marks every
/// direction in `exits` navigable, and flags the room as up to date.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomUpdate {
    /// Observed name.
    pub name: Option<String>,
    /// Observed static description.
    pub desc: Option<String>,
    /// Observed dynamic description.
    pub dynamic_desc: Option<String>,
    /// Observed terrain.
    pub terrain: Option<TerrainType>,
    /// Observed light.
    pub light: Option<LightType>,
    /// Directions observed to be open.
    pub exits: Option<ExitDirections>,
}

// ── RoomMutation ───────────────────────────────────────────────────

/// An edit of exactly one room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomMutation {
    /// Overwrite a room field.
    UpdateRoomField(RoomFieldVariant),
    /// Set, unset or toggle mob or load flags.
    ModifyRoomFlags {
        /// The flags to apply. Must be mob or load flags.
        flags: RoomFieldVariant,
        /// How to combine them.
        mode: FlagModifyMode,
    },
    /// Overwrite an exit field.
    UpdateExitField {
        /// The exit.
        dir: ExitDirection,
        /// The new value.
        var: ExitFieldVariant,
    },
    /// Set, unset or toggle exit or door flags.
    ModifyExitFlags {
        /// The exit.
        dir: ExitDirection,
        /// The flags to apply. Must be exit or door flags.
        flags: ExitFieldVariant,
        /// How to combine them.
        mode: FlagModifyMode,
    },
    /// Clear the temporary provenance of the room.
    MakePermanent,
    /// Apply observed properties.
    Update(RoomUpdate),
    /// Delete the room.
    Remove,
}

impl RoomMutation {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateRoomField(_) => "UpdateRoomField",
            Self::ModifyRoomFlags { .. } => "ModifyRoomFlags",
            Self::UpdateExitField { .. } => "UpdateExitField",
            Self::ModifyExitFlags { .. } => "ModifyExitFlags",
            Self::MakePermanent => "MakePermanent",
            Self::Update(_) => "Update",
            Self::Remove => "Remove",
        }
    }

    /// Panics if this is a flag edit of a kind with no flag semantics.
    pub fn assert_flag_semantics(&self) {
        match self {
            Self::ModifyRoomFlags { flags, .. } => assert!(
                flags.has_flag_semantics(),
                "{} has no flag semantics",
                flags.field()
            ),
            Self::ModifyExitFlags { flags, .. } => assert!(
                !matches!(flags, ExitFieldVariant::DoorName(_)),
                "door names have no flag semantics"
            ),
            _ => {}
        }
    }

    /// Runs before [`exec`](Self::exec).
    pub fn pre_exec(&self, id: RoomId, state: &mut StoreState) {
        if let Self::Remove = self {
            state.unlink_room(id);
        }
    }

    /// Apply the edit to room `id`.
    pub fn exec(&self, id: RoomId, state: &mut StoreState) {
        if let Self::Remove = self {
            state.remove_room(id);
            return;
        }
        let Some(room) = state.room_mut(id) else {
            return;
        };
        match self {
            Self::UpdateRoomField(var) => room.apply_field(var.clone()),
            Self::ModifyRoomFlags { flags, mode } => room.modify_flags(flags, *mode),
            Self::UpdateExitField { dir, var } => room.exit_mut(*dir).apply_field(var.clone()),
            Self::ModifyExitFlags { dir, flags, mode } => {
                room.exit_mut(*dir).modify_flags(flags, *mode)
            }
            Self::MakePermanent => room.set_permanent(),
            Self::Update(update) => {
                if let Some(name) = &update.name {
                    room.apply_field(RoomFieldVariant::Name(name.clone()));
                }
                if let Some(desc) = &update.desc {
                    room.apply_field(RoomFieldVariant::Desc(desc.clone()));
                }
                if let Some(dynamic_desc) = &update.dynamic_desc {
                    room.apply_field(RoomFieldVariant::DynamicDesc(dynamic_desc.clone()));
                }
                if let Some(terrain) = update.terrain {
                    room.apply_field(RoomFieldVariant::TerrainType(terrain));
                }
                if let Some(light) = update.light {
                    room.apply_field(RoomFieldVariant::LightType(light));
                }
                if let Some(exits) = update.exits {
                    for dir in ALL_EXITS_NESWUD {
                        if exits.contains(dir) {
                            room.exit_mut(dir).set_navigable(true);
                        }
                    }
                }
                room.set_up_to_date();
            }
            Self::Remove => {}
        }
    }

    /// Add the rooms this edit changes when applied to `id`.
    ///
    /// Removal also changes every room linked to the removed one.
    pub fn insert_affected(&self, id: RoomId, state: &StoreState, affected: &mut BTreeSet<RoomId>) {
        affected.insert(id);
        if let Self::Remove = self {
            if let Some(room) = state.room(id) {
                affected.extend(room.neighbours().iter());
            }
        }
    }
}

/// Applies a [`RoomMutation`] to one room.
///
/// # Examples
///
/// ```
/// use atlas_core::{Coordinate, RoomFieldVariant, TerrainType};
/// use atlas_store::{MapStore, Room, RoomMutation, SingleRoomAction};
///
/// let store = MapStore::default();
/// let id = store.insert_room(Room::at(Coordinate::ORIGIN)).unwrap();
/// let mut sel = store.new_selection();
/// let action = SingleRoomAction::new(
///     id,
///     RoomMutation::UpdateRoomField(RoomFieldVariant::TerrainType(TerrainType::City)),
/// );
/// store.execute(action, &mut sel).unwrap();
/// assert_eq!(store.room(id).unwrap().terrain(), TerrainType::City);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleRoomAction {
    id: RoomId,
    mutation: RoomMutation,
}

impl SingleRoomAction {
    /// Target `id` with `mutation`.
    ///
    /// # Panics
    ///
    /// Panics if `mutation` modifies flags of a kind that has none, such as
    /// a room name or a door name.
    pub fn new(id: RoomId, mutation: RoomMutation) -> Self {
        mutation.assert_flag_semantics();
        Self { id, mutation }
    }

    /// The target room.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// The wrapped edit.
    pub fn mutation(&self) -> &RoomMutation {
        &self.mutation
    }
}

impl MapAction for SingleRoomAction {
    fn name(&self) -> &str {
        self.mutation.name()
    }

    fn targets(&self) -> ActionTargets {
        smallvec![self.id]
    }

    fn affected_rooms(&self, state: &StoreState) -> BTreeSet<RoomId> {
        let mut affected = BTreeSet::new();
        self.mutation.insert_affected(self.id, state, &mut affected);
        affected
    }

    fn exec(&mut self, state: &mut StoreState) {
        self.mutation.pre_exec(self.id, state);
        self.mutation.exec(self.id, state);
    }
}

// ── AddExit / RemoveExit ───────────────────────────────────────────

/// Whether an exit edit also mirrors the reverse direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExitLinkMode {
    /// Edit `from → to` only; `to` just records the incoming link.
    #[default]
    OneWay,
    /// Also edit `to → from` through the opposite direction.
    TwoWay,
}

/// Connect `from` to `to` through `dir`.
///
/// One-way: `from`'s exit in `dir` becomes navigable and gains `to` as
/// outgoing target, and `to`'s opposite exit records `from` as incoming.
/// Two-way additionally makes `to`'s opposite exit navigable towards `from`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddExit {
    from: RoomId,
    to: RoomId,
    dir: ExitDirection,
    mode: ExitLinkMode,
}

impl AddExit {
    /// A one-way link.
    pub fn new(from: RoomId, to: RoomId, dir: ExitDirection) -> Self {
        Self {
            from,
            to,
            dir,
            mode: ExitLinkMode::OneWay,
        }
    }

    /// Choose the link mode.
    pub fn with_mode(mut self, mode: ExitLinkMode) -> Self {
        self.mode = mode;
        self
    }
}

impl MapAction for AddExit {
    fn name(&self) -> &str {
        "AddExit"
    }

    fn targets(&self) -> ActionTargets {
        smallvec![self.from, self.to]
    }

    fn exec(&mut self, state: &mut StoreState) {
        link(state, self.from, self.to, self.dir);
        if self.mode == ExitLinkMode::TwoWay {
            link(state, self.to, self.from, self.dir.opposite());
        }
    }
}

/// Disconnect `from` from `to` through `dir`; the inverse of [`AddExit`].
///
/// An exit left with no outgoing target stops being navigable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveExit {
    from: RoomId,
    to: RoomId,
    dir: ExitDirection,
    mode: ExitLinkMode,
}

impl RemoveExit {
    /// Remove a one-way link.
    pub fn new(from: RoomId, to: RoomId, dir: ExitDirection) -> Self {
        Self {
            from,
            to,
            dir,
            mode: ExitLinkMode::OneWay,
        }
    }

    /// Choose the link mode.
    pub fn with_mode(mut self, mode: ExitLinkMode) -> Self {
        self.mode = mode;
        self
    }
}

impl MapAction for RemoveExit {
    fn name(&self) -> &str {
        "RemoveExit"
    }

    fn targets(&self) -> ActionTargets {
        smallvec![self.from, self.to]
    }

    fn exec(&mut self, state: &mut StoreState) {
        unlink(state, self.from, self.to, self.dir);
        if self.mode == ExitLinkMode::TwoWay {
            unlink(state, self.to, self.from, self.dir.opposite());
        }
    }
}

fn link(state: &mut StoreState, from: RoomId, to: RoomId, dir: ExitDirection) {
    if let Some(room) = state.room_mut(from) {
        let exit = room.exit_mut(dir);
        exit.set_navigable(true);
        exit.add_out(to);
    }
    if let Some(room) = state.room_mut(to) {
        room.exit_mut(dir.opposite()).add_in(from);
    }
}

fn unlink(state: &mut StoreState, from: RoomId, to: RoomId, dir: ExitDirection) {
    if let Some(room) = state.room_mut(from) {
        let exit = room.exit_mut(dir);
        exit.remove_out(to);
        if exit.outgoing().is_empty() {
            exit.set_navigable(false);
        }
    }
    if let Some(room) = state.room_mut(to) {
        room.exit_mut(dir.opposite()).remove_in(from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Room;
    use atlas_core::{Coordinate, DoorFlag, ExitFlag, MobFlag, MobFlags};

    fn two_rooms() -> (StoreState, RoomId, RoomId) {
        let mut state = StoreState::new();
        let a = state.insert_room(Room::at(Coordinate::new(0, 0, 0))).unwrap();
        let b = state.insert_room(Room::at(Coordinate::new(1, 0, 0))).unwrap();
        (state, a, b)
    }

    #[test]
    fn add_then_remove_exit_round_trips() {
        let (mut state, a, b) = two_rooms();
        AddExit::new(a, b, ExitDirection::East).exec(&mut state);
        let east = state.room(a).unwrap().exit(ExitDirection::East);
        assert!(east.is_exit());
        assert!(east.out_is_unique());
        assert_eq!(east.out_first(), Some(b));
        assert!(state
            .room(b)
            .unwrap()
            .exit(ExitDirection::West)
            .incoming()
            .contains(a));
        assert!(!state.room(b).unwrap().exit(ExitDirection::West).is_exit());

        RemoveExit::new(a, b, ExitDirection::East).exec(&mut state);
        let east = state.room(a).unwrap().exit(ExitDirection::East);
        assert!(!east.is_exit());
        assert!(!east.outgoing().contains(b));
        assert!(state
            .room(b)
            .unwrap()
            .exit(ExitDirection::West)
            .incoming()
            .is_empty());
    }

    #[test]
    fn two_way_mirrors_the_reverse_side() {
        let (mut state, a, b) = two_rooms();
        AddExit::new(a, b, ExitDirection::East)
            .with_mode(ExitLinkMode::TwoWay)
            .exec(&mut state);
        let west = state.room(b).unwrap().exit(ExitDirection::West);
        assert!(west.is_exit());
        assert_eq!(west.out_first(), Some(a));

        RemoveExit::new(a, b, ExitDirection::East)
            .with_mode(ExitLinkMode::TwoWay)
            .exec(&mut state);
        assert!(state.room(a).unwrap().neighbours().is_empty());
        assert!(state.room(b).unwrap().neighbours().is_empty());
        assert!(state.room(b).unwrap().exit_directions().is_empty());
    }

    #[test]
    fn removing_one_of_two_targets_keeps_the_exit_open() {
        let mut state = StoreState::new();
        let a = state.insert_room(Room::at(Coordinate::new(0, 0, 0))).unwrap();
        let b = state.insert_room(Room::at(Coordinate::new(0, 1, 0))).unwrap();
        let c = state.insert_room(Room::at(Coordinate::new(0, 2, 0))).unwrap();
        AddExit::new(a, b, ExitDirection::North).exec(&mut state);
        AddExit::new(a, c, ExitDirection::North).exec(&mut state);
        RemoveExit::new(a, c, ExitDirection::North).exec(&mut state);
        let north = state.room(a).unwrap().exit(ExitDirection::North);
        assert!(north.is_exit());
        assert!(north.out_is_unique());
    }

    #[test]
    fn remove_reports_neighbours_as_affected() {
        let (mut state, a, b) = two_rooms();
        AddExit::new(a, b, ExitDirection::East).exec(&mut state);
        let action = SingleRoomAction::new(b, RoomMutation::Remove);
        let affected = action.affected_rooms(&state);
        assert_eq!(affected.into_iter().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn remove_detaches_and_deletes() {
        let (mut state, a, b) = two_rooms();
        AddExit::new(a, b, ExitDirection::East).exec(&mut state);
        SingleRoomAction::new(b, RoomMutation::Remove).exec(&mut state);
        assert!(!state.is_live(b));
        assert!(state.room(a).unwrap().exit(ExitDirection::East).outgoing().is_empty());
        assert!(state.check_consistency().is_empty());
    }

    #[test]
    fn single_room_mutations() {
        let (mut state, a, _) = two_rooms();
        let flags = MobFlags::from(MobFlag::Rent);
        let mut edits = vec![
            SingleRoomAction::new(
                a,
                RoomMutation::ModifyRoomFlags {
                    flags: RoomFieldVariant::MobFlags(flags),
                    mode: FlagModifyMode::Set,
                },
            ),
            SingleRoomAction::new(
                a,
                RoomMutation::ModifyExitFlags {
                    dir: ExitDirection::Up,
                    flags: ExitFieldVariant::DoorFlags(DoorFlag::Hidden.into()),
                    mode: FlagModifyMode::Toggle,
                },
            ),
            SingleRoomAction::new(
                a,
                RoomMutation::UpdateExitField {
                    dir: ExitDirection::Up,
                    var: ExitFieldVariant::DoorName("hatch".into()),
                },
            ),
            SingleRoomAction::new(a, RoomMutation::MakePermanent),
        ];
        for edit in &mut edits {
            edit.exec(&mut state);
        }
        let room = state.room(a).unwrap();
        assert_eq!(room.mob_flags(), flags);
        assert!(room.exit(ExitDirection::Up).door_flags().contains(DoorFlag::Hidden));
        assert_eq!(room.exit(ExitDirection::Up).door_name().as_str(), "hatch");
        assert!(!room.is_temporary());
    }

    #[test]
    #[should_panic(expected = "name has no flag semantics")]
    fn toggling_a_name_is_refused_at_construction() {
        SingleRoomAction::new(
            RoomId(0),
            RoomMutation::ModifyRoomFlags {
                flags: RoomFieldVariant::Name("x".into()),
                mode: FlagModifyMode::Toggle,
            },
        );
    }

    #[test]
    #[should_panic(expected = "door names have no flag semantics")]
    fn toggling_a_door_name_is_refused_at_construction() {
        SingleRoomAction::new(
            RoomId(0),
            RoomMutation::ModifyExitFlags {
                dir: ExitDirection::North,
                flags: ExitFieldVariant::DoorName("gate".into()),
                mode: FlagModifyMode::Toggle,
            },
        );
    }

    #[test]
    fn update_applies_observed_properties() {
        let (mut state, a, _) = two_rooms();
        let update = RoomUpdate {
            name: Some("Bree Gate".into()),
            terrain: Some(TerrainType::City),
            exits: Some([ExitDirection::North, ExitDirection::Unknown].into_iter().collect()),
            ..RoomUpdate::default()
        };
        SingleRoomAction::new(a, RoomMutation::Update(update)).exec(&mut state);
        let room = state.room(a).unwrap();
        assert_eq!(room.name(), "Bree Gate");
        assert_eq!(room.terrain(), TerrainType::City);
        assert!(room.is_up_to_date());
        assert!(room.exit(ExitDirection::North).exit_flags().contains(ExitFlag::Exit));
        assert!(!room.exit(ExitDirection::Unknown).is_exit());
    }

    #[test]
    fn boxed_actions_delegate() {
        let (state, a, b) = two_rooms();
        let boxed: Box<dyn MapAction> = Box::new(AddExit::new(a, b, ExitDirection::East));
        assert_eq!(boxed.name(), "AddExit");
        assert_eq!(boxed.targets().as_slice(), &[a, b]);
        assert_eq!(boxed.affected_rooms(&state).len(), 2);
    }
}
