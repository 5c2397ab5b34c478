//! Rooms and their exits.
//!
//! A [`Room`] carries its own [`Coordinate`] and [`RoomId`]; both are only
//! changed by the store so that the spatial index and the room table never
//! disagree about where a room lives.

use atlas_core::{
    AlignType, Coordinate, DoorFlags, DoorName, ExitDirection, ExitDirections, ExitField,
    ExitFieldVariant, ExitFlag, ExitFlags, FlagModifyMode, LightType, LoadFlags,
    MobFlags, PortableType, RidableType, RoomField, RoomFieldVariant, RoomId, RoomIdSet,
    SundeathType, TerrainType, ALL_EXITS7,
};

// ── Exit ───────────────────────────────────────────────────────────

/// One directional exit slot of a room.
///
/// An exit is navigable iff [`ExitFlag::Exit`] is set. Connectivity is kept
/// as two id sets: rooms this exit leads to, and rooms whose opposite exit
/// leads here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exit {
    door_name: DoorName,
    exit_flags: ExitFlags,
    door_flags: DoorFlags,
    incoming: RoomIdSet,
    outgoing: RoomIdSet,
}

impl Exit {
    /// A non-navigable exit with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this direction is navigable.
    pub fn is_exit(&self) -> bool {
        self.exit_flags.contains(ExitFlag::Exit)
    }

    /// Whether the outgoing set has exactly one member.
    ///
    /// Traversal only follows an exit when this holds.
    pub fn out_is_unique(&self) -> bool {
        self.outgoing.is_unique()
    }

    /// The smallest outgoing target, if any.
    pub fn out_first(&self) -> Option<RoomId> {
        self.outgoing.first()
    }

    /// Rooms this exit leads to.
    pub fn outgoing(&self) -> &RoomIdSet {
        &self.outgoing
    }

    /// Rooms whose opposite exit leads here.
    pub fn incoming(&self) -> &RoomIdSet {
        &self.incoming
    }

    /// Door name (empty for none).
    pub fn door_name(&self) -> &DoorName {
        &self.door_name
    }

    /// Exit flags.
    pub fn exit_flags(&self) -> ExitFlags {
        self.exit_flags
    }

    /// Door flags.
    pub fn door_flags(&self) -> DoorFlags {
        self.door_flags
    }

    /// Add an outgoing target.
    pub fn add_out(&mut self, id: RoomId) -> bool {
        self.outgoing.insert(id)
    }

    /// Remove an outgoing target.
    pub fn remove_out(&mut self, id: RoomId) -> bool {
        self.outgoing.remove(id)
    }

    /// Record an incoming source.
    pub fn add_in(&mut self, id: RoomId) -> bool {
        self.incoming.insert(id)
    }

    /// Forget an incoming source.
    pub fn remove_in(&mut self, id: RoomId) -> bool {
        self.incoming.remove(id)
    }

    /// Current value of one field.
    pub fn field_value(&self, field: ExitField) -> ExitFieldVariant {
        match field {
            ExitField::DoorName => ExitFieldVariant::DoorName(self.door_name.clone()),
            ExitField::ExitFlags => ExitFieldVariant::ExitFlags(self.exit_flags),
            ExitField::DoorFlags => ExitFieldVariant::DoorFlags(self.door_flags),
        }
    }

    /// Overwrite one field.
    pub fn apply_field(&mut self, var: ExitFieldVariant) {
        match var {
            ExitFieldVariant::DoorName(name) => self.door_name = name,
            ExitFieldVariant::ExitFlags(flags) => self.exit_flags = flags,
            ExitFieldVariant::DoorFlags(flags) => self.door_flags = flags,
        }
    }

    /// Whether this exit matches `var`.
    ///
    /// Door names compare by string equality, flag sets by subset test.
    pub fn matches(&self, var: &ExitFieldVariant) -> bool {
        match var {
            ExitFieldVariant::DoorName(name) => self.door_name == *name,
            ExitFieldVariant::ExitFlags(flags) => self.exit_flags.contains_all(flags),
            ExitFieldVariant::DoorFlags(flags) => self.door_flags.contains_all(flags),
        }
    }

    /// Apply the flags carried by `var` according to `mode`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is a door name, which has no flag semantics.
    pub fn modify_flags(&mut self, var: &ExitFieldVariant, mode: FlagModifyMode) {
        match var {
            ExitFieldVariant::ExitFlags(flags) => self.exit_flags.modify(flags, mode),
            ExitFieldVariant::DoorFlags(flags) => self.door_flags.modify(flags, mode),
            ExitFieldVariant::DoorName(_) => panic!("door names have no flag semantics"),
        }
    }

    pub(crate) fn set_navigable(&mut self, on: bool) {
        if on {
            self.exit_flags.insert(ExitFlag::Exit);
        } else {
            self.exit_flags.remove(ExitFlag::Exit);
        }
    }
}

// ── Room ───────────────────────────────────────────────────────────

/// A node of the map.
///
/// Rooms start out `temporary` (provenance not yet confirmed) and not
/// `up_to_date`. Build a template with [`Room::at`] and the `with_*`
/// helpers, then hand it to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    position: Coordinate,
    name: String,
    desc: String,
    dynamic_desc: String,
    note: String,
    mob_flags: MobFlags,
    load_flags: LoadFlags,
    align: AlignType,
    light: LightType,
    portable: PortableType,
    ridable: RidableType,
    sundeath: SundeathType,
    terrain: TerrainType,
    exits: [Exit; 7],
    temporary: bool,
    up_to_date: bool,
}

impl Default for Room {
    fn default() -> Self {
        Self::at(Coordinate::ORIGIN)
    }
}

impl Room {
    /// An empty room at `position` with no id yet.
    pub fn at(position: Coordinate) -> Self {
        Self {
            id: RoomId::INVALID,
            position,
            name: String::new(),
            desc: String::new(),
            dynamic_desc: String::new(),
            note: String::new(),
            mob_flags: MobFlags::empty(),
            load_flags: LoadFlags::empty(),
            align: AlignType::default(),
            light: LightType::default(),
            portable: PortableType::default(),
            ridable: RidableType::default(),
            sundeath: SundeathType::default(),
            terrain: TerrainType::default(),
            exits: Default::default(),
            temporary: true,
            up_to_date: false,
        }
    }

    /// Give a template an explicit id (for predefined rooms).
    pub fn with_id(mut self, id: RoomId) -> Self {
        self.id = id;
        self
    }

    /// Set a field on a template.
    pub fn with_field(mut self, var: RoomFieldVariant) -> Self {
        self.apply_field(var);
        self
    }

    /// Stable id. [`RoomId::INVALID`] until the store assigns one.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Current position.
    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Room name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static description.
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Dynamic description.
    pub fn dynamic_desc(&self) -> &str {
        &self.dynamic_desc
    }

    /// User note.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Mobile flags.
    pub fn mob_flags(&self) -> MobFlags {
        self.mob_flags
    }

    /// Load flags.
    pub fn load_flags(&self) -> LoadFlags {
        self.load_flags
    }

    /// Terrain.
    pub fn terrain(&self) -> TerrainType {
        self.terrain
    }

    /// Light.
    pub fn light(&self) -> LightType {
        self.light
    }

    /// Whether the room's provenance is still uncertain.
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Whether the room was refreshed by an update since creation.
    pub fn is_up_to_date(&self) -> bool {
        self.up_to_date
    }

    /// The exit in `dir`.
    pub fn exit(&self, dir: ExitDirection) -> &Exit {
        &self.exits[dir.index()]
    }

    /// Mutable access to the exit in `dir`.
    pub fn exit_mut(&mut self, dir: ExitDirection) -> &mut Exit {
        &mut self.exits[dir.index()]
    }

    /// All seven exits with their directions.
    pub fn exits(&self) -> impl Iterator<Item = (ExitDirection, &Exit)> + '_ {
        ALL_EXITS7
            .into_iter()
            .map(move |d| (d, &self.exits[d.index()]))
    }

    /// Directions whose exit is navigable.
    pub fn exit_directions(&self) -> ExitDirections {
        self.exits()
            .filter(|(_, e)| e.is_exit())
            .map(|(d, _)| d)
            .collect()
    }

    /// Every room connected to this one through any exit, either way.
    pub fn neighbours(&self) -> RoomIdSet {
        self.exits
            .iter()
            .flat_map(|e| e.outgoing.iter().chain(e.incoming.iter()))
            .collect()
    }

    /// Current value of one field.
    pub fn field_value(&self, field: RoomField) -> RoomFieldVariant {
        match field {
            RoomField::Name => RoomFieldVariant::Name(self.name.clone()),
            RoomField::Desc => RoomFieldVariant::Desc(self.desc.clone()),
            RoomField::DynamicDesc => RoomFieldVariant::DynamicDesc(self.dynamic_desc.clone()),
            RoomField::Note => RoomFieldVariant::Note(self.note.clone()),
            RoomField::MobFlags => RoomFieldVariant::MobFlags(self.mob_flags),
            RoomField::LoadFlags => RoomFieldVariant::LoadFlags(self.load_flags),
            RoomField::AlignType => RoomFieldVariant::AlignType(self.align),
            RoomField::LightType => RoomFieldVariant::LightType(self.light),
            RoomField::PortableType => RoomFieldVariant::PortableType(self.portable),
            RoomField::RidableType => RoomFieldVariant::RidableType(self.ridable),
            RoomField::SundeathType => RoomFieldVariant::SundeathType(self.sundeath),
            RoomField::TerrainType => RoomFieldVariant::TerrainType(self.terrain),
        }
    }

    /// Overwrite one field.
    pub fn apply_field(&mut self, var: RoomFieldVariant) {
        match var {
            RoomFieldVariant::Name(v) => self.name = v,
            RoomFieldVariant::Desc(v) => self.desc = v,
            RoomFieldVariant::DynamicDesc(v) => self.dynamic_desc = v,
            RoomFieldVariant::Note(v) => self.note = v,
            RoomFieldVariant::MobFlags(v) => self.mob_flags = v,
            RoomFieldVariant::LoadFlags(v) => self.load_flags = v,
            RoomFieldVariant::AlignType(v) => self.align = v,
            RoomFieldVariant::LightType(v) => self.light = v,
            RoomFieldVariant::PortableType(v) => self.portable = v,
            RoomFieldVariant::RidableType(v) => self.ridable = v,
            RoomFieldVariant::SundeathType(v) => self.sundeath = v,
            RoomFieldVariant::TerrainType(v) => self.terrain = v,
        }
    }

    /// Whether this room matches `var`.
    ///
    /// Notes and enumerated properties compare by equality, mob and load
    /// flags by subset test.
    ///
    /// # Panics
    ///
    /// Panics for name and descriptions, which have no flag semantics.
    pub fn matches(&self, var: &RoomFieldVariant) -> bool {
        match var {
            RoomFieldVariant::Note(v) => self.note == *v,
            RoomFieldVariant::MobFlags(v) => self.mob_flags.contains_all(v),
            RoomFieldVariant::LoadFlags(v) => self.load_flags.contains_all(v),
            RoomFieldVariant::AlignType(v) => self.align == *v,
            RoomFieldVariant::LightType(v) => self.light == *v,
            RoomFieldVariant::PortableType(v) => self.portable == *v,
            RoomFieldVariant::RidableType(v) => self.ridable == *v,
            RoomFieldVariant::SundeathType(v) => self.sundeath == *v,
            RoomFieldVariant::TerrainType(v) => self.terrain == *v,
            RoomFieldVariant::Name(_)
            | RoomFieldVariant::Desc(_)
            | RoomFieldVariant::DynamicDesc(_) => {
                panic!("{} has no flag semantics", var.field())
            }
        }
    }

    /// Apply mob or load flags according to `mode`. Notes and enumerated
    /// properties are overwritten as by [`apply_field`](Self::apply_field).
    ///
    /// # Panics
    ///
    /// Panics for name and descriptions, which have no flag semantics.
    pub fn modify_flags(&mut self, var: &RoomFieldVariant, mode: FlagModifyMode) {
        match var {
            RoomFieldVariant::MobFlags(v) => self.mob_flags.modify(v, mode),
            RoomFieldVariant::LoadFlags(v) => self.load_flags.modify(v, mode),
            RoomFieldVariant::Name(_)
            | RoomFieldVariant::Desc(_)
            | RoomFieldVariant::DynamicDesc(_) => {
                panic!("{} has no flag semantics", var.field())
            }
            other => self.apply_field(other.clone()),
        }
    }

    pub(crate) fn set_id(&mut self, id: RoomId) {
        self.id = id;
    }

    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn set_permanent(&mut self) {
        self.temporary = false;
    }

    pub(crate) fn set_up_to_date(&mut self) {
        self.up_to_date = true;
    }
}
