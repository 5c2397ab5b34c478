//! Core value types for the Atlas room map store.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the values that flow between the spatial index, the action layer and
//! the store facade: coordinates, identifiers, directions, flag sets,
//! room/exit field variants and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coord;
pub mod direction;
pub mod error;
pub mod field;
pub mod flags;
pub mod id;

pub use coord::Coordinate;
pub use direction::{CommandId, ExitDirection, ALL_EXITS7, ALL_EXITS_NESWUD};
pub use error::{ActionError, StoreError};
pub use field::{
    AlignType, DoorName, ExitField, ExitFieldVariant, LightType, PortableType, RidableType,
    RoomField, RoomFieldVariant, SundeathType, TerrainType,
};
pub use flags::{
    DoorFlag, DoorFlags, ExitDirections, ExitFlag, ExitFlags, Flag, FlagModifyMode, FlagSet,
    LoadFlag, LoadFlags, MobFlag, MobFlags,
};
pub use id::{RecipientToken, RoomId, RoomIdSet};
