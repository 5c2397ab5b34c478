//! Room and exit field kinds, and the tagged variants that carry their values.
//!
//! Generic get/compare/toggle code dispatches over [`RoomFieldVariant`] and
//! [`ExitFieldVariant`] with exhaustive matches instead of one method per
//! field, so adding a field kind forces every dispatch site to handle it.

use crate::flags::{DoorFlags, ExitFlags, LoadFlags, MobFlags};
use std::fmt;

/// Moral alignment of a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignType {
    /// Not yet observed.
    #[default]
    Undefined,
    /// Good.
    Good,
    /// Neutral.
    Neutral,
    /// Evil.
    Evil,
}

/// Ambient light in a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LightType {
    /// Not yet observed.
    #[default]
    Undefined,
    /// Dark.
    Dark,
    /// Lit.
    Lit,
}

/// Whether portals work in a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PortableType {
    /// Not yet observed.
    #[default]
    Undefined,
    /// Portals work.
    Portable,
    /// Portals do not work.
    NotPortable,
}

/// Whether a room can be entered mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RidableType {
    /// Not yet observed.
    #[default]
    Undefined,
    /// Mounts may enter.
    Ridable,
    /// Mounts may not enter.
    NotRidable,
}

/// Whether sunlight reaches the room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SundeathType {
    /// Not yet observed.
    #[default]
    Undefined,
    /// Exposed to sunlight.
    Sundeath,
    /// Sheltered from sunlight.
    NoSundeath,
}

/// Terrain of a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainType {
    /// Not yet observed.
    #[default]
    Undefined,
    /// Indoors.
    Indoors,
    /// City streets.
    City,
    /// Open field.
    Field,
    /// Forest.
    Forest,
    /// Hills.
    Hills,
    /// Mountains.
    Mountains,
    /// Shallow water.
    Shallow,
    /// Deep water.
    Water,
    /// Rapids.
    Rapids,
    /// Underwater.
    Underwater,
    /// Road.
    Road,
    /// Brush.
    Brush,
    /// Tunnel.
    Tunnel,
    /// Cavern.
    Cavern,
    /// Death trap.
    DeathTrap,
}

/// Name of a door. Empty means "no door name".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoorName(String);

impl DoorName {
    /// Create a door name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether there is no name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DoorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DoorName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DoorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind tag of a room field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomField {
    /// Room name.
    Name,
    /// Static description.
    Desc,
    /// Dynamic (contents) description.
    DynamicDesc,
    /// Free-form user note.
    Note,
    /// Mobile flags.
    MobFlags,
    /// Load flags.
    LoadFlags,
    /// Alignment.
    AlignType,
    /// Light.
    LightType,
    /// Portability.
    PortableType,
    /// Ridability.
    RidableType,
    /// Sun exposure.
    SundeathType,
    /// Terrain.
    TerrainType,
}

impl RoomField {
    /// Whether flag queries and toggles are meaningful for this kind.
    ///
    /// Name and both descriptions carry free text with no flag semantics.
    pub fn has_flag_semantics(self) -> bool {
        !matches!(self, Self::Name | Self::Desc | Self::DynamicDesc)
    }
}

impl fmt::Display for RoomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Desc => "description",
            Self::DynamicDesc => "dynamic description",
            Self::Note => "note",
            Self::MobFlags => "mob flags",
            Self::LoadFlags => "load flags",
            Self::AlignType => "alignment",
            Self::LightType => "light",
            Self::PortableType => "portability",
            Self::RidableType => "ridability",
            Self::SundeathType => "sundeath",
            Self::TerrainType => "terrain",
        };
        f.write_str(s)
    }
}

/// A room field together with its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomFieldVariant {
    /// Room name.
    Name(String),
    /// Static description.
    Desc(String),
    /// Dynamic description.
    DynamicDesc(String),
    /// User note.
    Note(String),
    /// Mobile flags.
    MobFlags(MobFlags),
    /// Load flags.
    LoadFlags(LoadFlags),
    /// Alignment.
    AlignType(AlignType),
    /// Light.
    LightType(LightType),
    /// Portability.
    PortableType(PortableType),
    /// Ridability.
    RidableType(RidableType),
    /// Sun exposure.
    SundeathType(SundeathType),
    /// Terrain.
    TerrainType(TerrainType),
}

impl RoomFieldVariant {
    /// The kind of field this value belongs to.
    pub fn field(&self) -> RoomField {
        match self {
            Self::Name(_) => RoomField::Name,
            Self::Desc(_) => RoomField::Desc,
            Self::DynamicDesc(_) => RoomField::DynamicDesc,
            Self::Note(_) => RoomField::Note,
            Self::MobFlags(_) => RoomField::MobFlags,
            Self::LoadFlags(_) => RoomField::LoadFlags,
            Self::AlignType(_) => RoomField::AlignType,
            Self::LightType(_) => RoomField::LightType,
            Self::PortableType(_) => RoomField::PortableType,
            Self::RidableType(_) => RoomField::RidableType,
            Self::SundeathType(_) => RoomField::SundeathType,
            Self::TerrainType(_) => RoomField::TerrainType,
        }
    }

    /// Shorthand for `self.field().has_flag_semantics()`.
    pub fn has_flag_semantics(&self) -> bool {
        self.field().has_flag_semantics()
    }

    /// Whether this is one of the two bitset kinds (mob or load flags).
    pub fn is_flag_set(&self) -> bool {
        matches!(self, Self::MobFlags(_) | Self::LoadFlags(_))
    }
}

/// Kind tag of an exit field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitField {
    /// Door name.
    DoorName,
    /// Exit flags.
    ExitFlags,
    /// Door flags.
    DoorFlags,
}

/// An exit field together with its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitFieldVariant {
    /// Door name.
    DoorName(DoorName),
    /// Exit flags.
    ExitFlags(ExitFlags),
    /// Door flags.
    DoorFlags(DoorFlags),
}

impl ExitFieldVariant {
    /// The kind of field this value belongs to.
    pub fn field(&self) -> ExitField {
        match self {
            Self::DoorName(_) => ExitField::DoorName,
            Self::ExitFlags(_) => ExitField::ExitFlags,
            Self::DoorFlags(_) => ExitField::DoorFlags,
        }
    }
}
