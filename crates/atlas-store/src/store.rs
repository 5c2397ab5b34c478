//! The thread-safe map store facade.
//!
//! [`MapStore`] wraps a [`StoreState`] in one coarse `parking_lot::Mutex`.
//! Every public operation takes the lock for its full duration, so callers
//! always observe a consistent map. Collaborator callbacks (visitors,
//! factories, recipients, filters, drawers) run while the lock is held.

use crate::action::{ActionReport, MapAction, RoomMutation, SingleRoomAction};
use crate::collab::{RoomDrawer, RoomFactory, RoomFilter, RoomRecipient, RoomVisitor};
use crate::config::{ConfigError, StoreConfig};
use crate::draw::DrawStream;
use crate::marker::InfoMark;
use crate::metrics::StoreMetrics;
use crate::room::Room;
use crate::selection::RoomSelection;
use crate::state::{Inconsistency, StoreState};
use atlas_core::{
    ActionError, CommandId, Coordinate, DoorName, ExitDirection, ExitDirections, ExitFieldVariant,
    FlagModifyMode, RecipientToken, RoomFieldVariant, RoomId, StoreError, ALL_EXITS_NESWUD,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A map of rooms shared between threads.
///
/// # Examples
///
/// ```
/// use atlas_core::{CommandId, Coordinate, ExitDirection};
/// use atlas_store::{AddExit, MapStore, Room};
///
/// let store = MapStore::default();
/// let a = store.insert_room(Room::at(Coordinate::new(0, 0, 0))).unwrap();
/// let b = store.insert_room(Room::at(Coordinate::new(1, 0, 0))).unwrap();
/// store.schedule(AddExit::new(a, b, ExitDirection::East)).unwrap();
///
/// let path = store.path(Coordinate::ORIGIN, &[CommandId::East]);
/// assert_eq!(path, vec![Coordinate::new(1, 0, 0)]);
/// ```
#[derive(Debug, Default)]
pub struct MapStore {
    state: Mutex<StoreState>,
    config: StoreConfig,
}

impl MapStore {
    /// Build an empty store.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(StoreState::new()),
            config,
        })
    }

    /// The configuration the store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// A copy of the counters.
    pub fn metrics(&self) -> StoreMetrics {
        self.state.lock().metrics().clone()
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.state.lock().rooms().len()
    }

    /// Returns `true` if the store holds no rooms.
    pub fn is_empty(&self) -> bool {
        self.state.lock().rooms().is_empty()
    }

    /// Run `f` against the state under the lock.
    ///
    /// `f` must not call back into this store.
    pub fn with_state<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Scan for broken cross-structure invariants. Empty means consistent.
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        self.state.lock().check_consistency()
    }

    // ── lookup ─────────────────────────────────────────────────────

    /// The live room with this id.
    pub fn room(&self, id: RoomId) -> Option<Arc<Room>> {
        self.state.lock().shared_room(id).cloned()
    }

    /// The room at `pos`.
    pub fn room_at(&self, pos: Coordinate) -> Option<Arc<Room>> {
        self.state.lock().room_at(&pos).cloned()
    }

    /// Look up room `id` and bind it into `selection`.
    pub fn select_room(&self, id: RoomId, selection: &mut RoomSelection) -> Option<Arc<Room>> {
        let mut state = self.state.lock();
        let room = state.shared_room(id).cloned()?;
        bind(&mut state, selection, id, Arc::clone(&room));
        Some(room)
    }

    /// Look up the room at `pos` and bind it into `selection`.
    pub fn select_room_at(
        &self,
        pos: Coordinate,
        selection: &mut RoomSelection,
    ) -> Option<Arc<Room>> {
        let mut state = self.state.lock();
        let room = state.room_at(&pos).cloned()?;
        bind(&mut state, selection, room.id(), Arc::clone(&room));
        Some(room)
    }

    // ── placement ──────────────────────────────────────────────────

    /// Insert `template` at the free coordinate nearest to `near`.
    ///
    /// The template's id and position are replaced.
    pub fn create_room(
        &self,
        template: Room,
        near: Coordinate,
    ) -> Result<(RoomId, Coordinate), StoreError> {
        self.state.lock().place_room_near(template, near)
    }

    /// Insert a predefined room at its own position.
    pub fn insert_room(&self, room: Room) -> Result<RoomId, StoreError> {
        self.state.lock().insert_room(room)
    }

    /// Move a live room to `to`.
    pub fn move_room(&self, id: RoomId, to: Coordinate) -> Result<(), StoreError> {
        self.state.lock().move_room(id, to)
    }

    /// Create rooms through `factory` for every free coordinate of the box
    /// spanned by `a` and `b`. Returns the number created.
    ///
    /// If the id space runs out part way, the rooms created so far stay.
    pub fn fill_area(
        &self,
        a: Coordinate,
        b: Coordinate,
        factory: &mut dyn RoomFactory,
    ) -> Result<usize, StoreError> {
        self.state.lock().fill_area(a, b, factory)
    }

    // ── exits and flags ────────────────────────────────────────────

    /// Door name of the exit in `dir` of the room at `pos`.
    ///
    /// Reports the configured `missing_door_name` when there is no room or
    /// `dir` is [`ExitDirection::Unknown`].
    pub fn door_name(&self, pos: Coordinate, dir: ExitDirection) -> DoorName {
        let state = self.state.lock();
        match state.room_at(&pos) {
            Some(room) if dir.is_neswud() => room.exit(dir).door_name().clone(),
            _ => DoorName::new(self.config.missing_door_name.as_str()),
        }
    }

    /// Rename the door in `dir` of the room at `pos`.
    ///
    /// Returns `false` if there is no room or `dir` is
    /// [`ExitDirection::Unknown`].
    pub fn set_door_name(&self, pos: Coordinate, dir: ExitDirection, name: DoorName) -> bool {
        if !dir.is_neswud() {
            return false;
        }
        self.run_on_room_at(
            pos,
            RoomMutation::UpdateExitField {
                dir,
                var: ExitFieldVariant::DoorName(name),
            },
        )
    }

    /// Navigable directions of the room at `pos` (empty if none).
    pub fn exit_directions(&self, pos: Coordinate) -> ExitDirections {
        let state = self.state.lock();
        state
            .room_at(&pos)
            .map(|room| room.exit_directions())
            .unwrap_or_default()
    }

    /// Whether the exit in `dir` of the room at `pos` matches `var`.
    ///
    /// Door names compare by equality, flag sets by subset test. `false` if
    /// there is no room.
    pub fn exit_flag(&self, pos: Coordinate, dir: ExitDirection, var: &ExitFieldVariant) -> bool {
        let state = self.state.lock();
        state
            .room_at(&pos)
            .is_some_and(|room| room.exit(dir).matches(var))
    }

    /// Toggle exit or door flags on the exit in `dir` of the room at `pos`.
    ///
    /// Returns `false` if there is no room.
    ///
    /// # Panics
    ///
    /// Panics if `var` is a door name.
    pub fn toggle_exit_flag(&self, pos: Coordinate, dir: ExitDirection, var: ExitFieldVariant) -> bool {
        assert!(
            !matches!(var, ExitFieldVariant::DoorName(_)),
            "door names have no flag semantics"
        );
        self.run_on_room_at(
            pos,
            RoomMutation::ModifyExitFlags {
                dir,
                flags: var,
                mode: FlagModifyMode::Toggle,
            },
        )
    }

    /// Whether the room at `pos` matches `var`. `false` if there is no room.
    ///
    /// # Panics
    ///
    /// Panics for name and descriptions, which have no flag semantics.
    pub fn room_flag(&self, pos: Coordinate, var: &RoomFieldVariant) -> bool {
        assert_flag_semantics(var);
        let state = self.state.lock();
        state.room_at(&pos).is_some_and(|room| room.matches(var))
    }

    /// Toggle mob or load flags on the room at `pos`; any other kind is
    /// overwritten with `var`.
    ///
    /// Returns `false` if there is no room.
    ///
    /// # Panics
    ///
    /// Panics for name and descriptions, which have no flag semantics.
    pub fn toggle_room_flag(&self, pos: Coordinate, var: RoomFieldVariant) -> bool {
        assert_flag_semantics(&var);
        let mutation = if var.is_flag_set() {
            RoomMutation::ModifyRoomFlags {
                flags: var,
                mode: FlagModifyMode::Toggle,
            }
        } else {
            RoomMutation::UpdateRoomField(var)
        };
        self.run_on_room_at(pos, mutation)
    }

    // ── traversal and ranges ───────────────────────────────────────

    /// Follow `commands` from the room at `start` and return the position of
    /// every room reached.
    ///
    /// `Look` is skipped. Any command that is not one of the six directions
    /// ends the walk. A direction without a navigable exit is skipped; an
    /// exit with zero or several targets, or whose target is gone, ends the
    /// walk.
    pub fn path(&self, start: Coordinate, commands: &[CommandId]) -> Vec<Coordinate> {
        let state = self.state.lock();
        let mut path = Vec::new();
        let Some(mut room) = state.room_at(&start) else {
            return path;
        };
        for &cmd in commands {
            if cmd == CommandId::Look {
                continue;
            }
            let Some(dir) = cmd.direction().filter(|d| d.is_neswud()) else {
                break;
            };
            let exit = room.exit(dir);
            if !exit.is_exit() {
                continue;
            }
            if !exit.out_is_unique() {
                break;
            }
            let Some(next) = exit.out_first().and_then(|id| state.shared_room(id)) else {
                break;
            };
            room = next;
            path.push(room.position());
        }
        path
    }

    /// Stream every room in the closed box spanned by `a` and `b` to
    /// `visitor`, in `z`, `y`, `x` order.
    pub fn visit_rooms(&self, a: Coordinate, b: Coordinate, visitor: &mut dyn RoomVisitor) {
        let state = self.state.lock();
        state.index().rooms_in(a, b, |_, id| {
            if let Some(room) = state.shared_room(id) {
                visitor.visit(room);
            }
        });
    }

    /// Hand every room in the closed box spanned by `a` and `b` to `drawer`,
    /// layer by layer.
    pub fn draw(&self, a: Coordinate, b: Coordinate, drawer: &mut dyn RoomDrawer) {
        let state = self.state.lock();
        let mut stream = DrawStream::new();
        state.index().rooms_in(a, b, |_, id| stream.visit(&state, id));
        stream.draw(drawer);
    }

    // ── actions ────────────────────────────────────────────────────

    /// Run `action` on behalf of `selection`.
    ///
    /// The selection's claims are released and the selection emptied before
    /// the action is checked, so the action may remove or move any room the
    /// selection held. Afterwards every previously held room that is still
    /// live is claimed again and re-bound with its current content. This
    /// happens whether or not the action ran.
    pub fn execute(
        &self,
        mut action: impl MapAction,
        selection: &mut RoomSelection,
    ) -> Result<ActionReport, ActionError> {
        let mut state = self.state.lock();
        let token = selection.token();
        let held = selection.take_ids();
        for id in &held {
            state.locks_mut().unlock(token, *id);
        }

        let result = run_action(&mut state, &self.config, &mut action);

        for id in held {
            if let Some(room) = state.shared_room(id).cloned() {
                state.locks_mut().lock(token, id);
                selection.insert(id, room);
            }
        }
        debug!(selection = %token, rooms = selection.len(), "selection re-bound");
        result
    }

    /// Run `action` without a selection.
    pub fn schedule(&self, mut action: impl MapAction) -> Result<ActionReport, ActionError> {
        let mut state = self.state.lock();
        run_action(&mut state, &self.config, &mut action)
    }

    // ── bulk ───────────────────────────────────────────────────────

    /// Drop every room, claim and marker.
    ///
    /// Room ids and recipient tokens are never reused, and counters keep
    /// running.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let rooms = state.rooms().len();
        state.clear();
        info!(rooms, "cleared map store");
    }

    /// Erase the door name of every direction of every room.
    ///
    /// Returns the number of rooms touched. A room whose edits were all
    /// rejected, for example because it is claimed and the store refuses
    /// claimed targets, is not counted.
    pub fn remove_door_names(&self) -> usize {
        let mut state = self.state.lock();
        let ids: Vec<RoomId> = state.rooms().ids().collect();
        let mut touched = 0;
        for id in ids {
            let mut edited = false;
            for dir in ALL_EXITS_NESWUD {
                let mut action = SingleRoomAction::new(
                    id,
                    RoomMutation::UpdateExitField {
                        dir,
                        var: ExitFieldVariant::DoorName(DoorName::default()),
                    },
                );
                // Rejections are already logged and counted.
                edited |= run_action(&mut state, &self.config, &mut action).is_ok();
            }
            if edited {
                touched += 1;
            }
        }
        touched
    }

    /// Deliver every room matching `filter` to `recipient`, claiming each
    /// one under `token` first. Returns the number of matches.
    pub fn generic_search(
        &self,
        token: RecipientToken,
        recipient: &mut dyn RoomRecipient,
        filter: &dyn RoomFilter,
    ) -> usize {
        let mut state = self.state.lock();
        let matches: Vec<(RoomId, Arc<Room>)> = state
            .rooms()
            .iter()
            .filter(|(_, room)| filter.filter(room))
            .map(|(id, room)| (id, Arc::clone(room)))
            .collect();
        for (id, room) in &matches {
            state.locks_mut().lock(token, *id);
            recipient.receive_room(room);
        }
        let metrics = state.metrics_mut();
        metrics.searches += 1;
        metrics.rooms_delivered += matches.len() as u64;
        debug!(recipient = %token, matches = matches.len(), "search delivered");
        matches.len()
    }

    // ── claims ─────────────────────────────────────────────────────

    /// Issue a token for an ad-hoc search recipient.
    pub fn register_recipient(&self) -> RecipientToken {
        self.state.lock().issue_token()
    }

    /// Drop every claim held under `token`. Returns how many were dropped.
    pub fn release_recipient(&self, token: RecipientToken) -> usize {
        self.state.lock().locks_mut().unlock_all(token)
    }

    /// Drop `token`'s claim on room `id`.
    pub fn unlock(&self, token: RecipientToken, id: RoomId) -> bool {
        self.state.lock().locks_mut().unlock(token, id)
    }

    /// Recipients currently claiming room `id`.
    pub fn holders(&self, id: RoomId) -> Vec<RecipientToken> {
        self.state.lock().locks().holders(id).collect()
    }

    /// A fresh, empty selection with its own token.
    pub fn new_selection(&self) -> RoomSelection {
        RoomSelection::new(self.state.lock().issue_token())
    }

    /// Release every claim of `selection` and empty it.
    pub fn unselect(&self, selection: &mut RoomSelection) {
        let mut state = self.state.lock();
        let token = selection.token();
        for id in selection.take_ids() {
            state.locks_mut().unlock(token, id);
        }
    }

    /// Release one room of `selection`. Returns `false` if it was not
    /// selected.
    pub fn unselect_room(&self, selection: &mut RoomSelection, id: RoomId) -> bool {
        let mut state = self.state.lock();
        if selection.remove(id).is_none() {
            return false;
        }
        state.locks_mut().unlock(selection.token(), id);
        true
    }

    // ── markers ────────────────────────────────────────────────────

    /// Add an info marker.
    pub fn add_marker(&self, mark: Arc<InfoMark>) {
        self.state.lock().markers_mut().add(mark);
    }

    /// Remove an info marker by identity.
    pub fn remove_marker(&self, mark: &Arc<InfoMark>) -> bool {
        self.state.lock().markers_mut().remove(mark)
    }

    /// Remove several info markers by identity. Returns how many were found.
    pub fn remove_markers(&self, marks: &[Arc<InfoMark>]) -> usize {
        let mut state = self.state.lock();
        let markers = state.markers_mut();
        marks.iter().filter(|m| markers.remove(m)).count()
    }

    /// All info markers in insertion order.
    pub fn markers(&self) -> Vec<Arc<InfoMark>> {
        self.state.lock().markers().as_slice().to_vec()
    }

    fn run_on_room_at(&self, pos: Coordinate, mutation: RoomMutation) -> bool {
        let mut state = self.state.lock();
        let Some(id) = state.id_at(&pos) else {
            return false;
        };
        let mut action = SingleRoomAction::new(id, mutation);
        run_action(&mut state, &self.config, &mut action).is_ok()
    }
}

fn assert_flag_semantics(var: &RoomFieldVariant) {
    assert!(
        var.has_flag_semantics(),
        "{} has no flag semantics",
        var.field()
    );
}

fn bind(state: &mut StoreState, selection: &mut RoomSelection, id: RoomId, room: Arc<Room>) {
    state.locks_mut().lock(selection.token(), id);
    selection.insert(id, room);
    debug!(selection = %selection.token(), room = %id, "room selected");
}

/// Check and run one action. The caller holds the store lock.
fn run_action(
    state: &mut StoreState,
    config: &StoreConfig,
    action: &mut dyn MapAction,
) -> Result<ActionReport, ActionError> {
    match check_executable(state, config, action) {
        Ok(()) => {}
        Err(err) => {
            state.metrics_mut().actions_rejected += 1;
            warn!(action = action.name(), error = %err, "unable to execute action");
            return Err(err);
        }
    }
    let affected = action.affected_rooms(state);
    action.exec(state);
    state.metrics_mut().actions_executed += 1;
    Ok(ActionReport {
        action: action.name().to_string(),
        affected,
    })
}

fn check_executable(
    state: &StoreState,
    config: &StoreConfig,
    action: &dyn MapAction,
) -> Result<(), ActionError> {
    let targets = action.targets();
    if targets.is_empty() {
        return Err(ActionError::NoTargets {
            action: action.name().to_string(),
        });
    }
    if let Some(&room) = targets.iter().find(|id| !state.is_live(**id)) {
        return Err(ActionError::NotExecutable {
            action: action.name().to_string(),
            room,
        });
    }
    if config.refuse_locked_targets {
        for room in action.affected_rooms(state) {
            let holders: Vec<RecipientToken> = state.locks().holders(room).collect();
            if !holders.is_empty() {
                return Err(ActionError::TargetLocked {
                    action: action.name().to_string(),
                    room,
                    holders,
                });
            }
        }
    }
    Ok(())
}
