//! Atlas: a concurrency-safe store for 3D room maps.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Atlas sub-crates. For most users, adding `atlas` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use atlas::prelude::*;
//!
//! let store = MapStore::default();
//! let hall = store.insert_room(Room::at(Coordinate::new(0, 0, 0))).unwrap();
//! let (yard, at) = store.create_room(Room::default(), Coordinate::new(1, 0, 0)).unwrap();
//! assert_eq!(at, Coordinate::new(1, 0, 0));
//!
//! store
//!     .schedule(AddExit::new(hall, yard, ExitDirection::East).with_mode(ExitLinkMode::TwoWay))
//!     .unwrap();
//!
//! // Selections survive edits of the rooms they hold.
//! let mut sel = store.new_selection();
//! store.select_room(yard, &mut sel);
//! store
//!     .execute(SingleRoomAction::new(yard, RoomMutation::Remove), &mut sel)
//!     .unwrap();
//! assert!(sel.is_empty());
//! assert!(store.path(Coordinate::ORIGIN, &[CommandId::East]).is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `atlas-core` | Coordinates, ids, directions, flags, field variants, errors |
//! | [`space`] | `atlas-space` | Spatial index, coordinate boxes, spiral search |
//! | [`store`] | `atlas-store` | Rooms, actions, selections, the `MapStore` facade |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`atlas-core`).
///
/// Contains [`types::Coordinate`], [`types::RoomId`], the direction and
/// command enums, flag sets, and the [`types::StoreError`] and
/// [`types::ActionError`] enums.
pub use atlas_core as types;

/// Spatial index and free-slot search (`atlas-space`).
///
/// Provides [`space::SpatialIndex`] and [`space::nearest_free`].
pub use atlas_space as space;

/// The room map store (`atlas-store`).
///
/// [`store::MapStore`] is the entry point; edits go through
/// [`store::MapAction`] implementations.
pub use atlas_store as store;

/// Common imports for typical Atlas usage.
///
/// ```rust
/// use atlas::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use atlas_core::{
        CommandId, Coordinate, DoorName, ExitDirection, ExitFieldVariant, FlagModifyMode,
        RecipientToken, RoomFieldVariant, RoomId, TerrainType,
    };

    // Errors
    pub use atlas_core::{ActionError, StoreError};

    // Store
    pub use atlas_store::{
        AddExit, ExitLinkMode, FieldFilter, FilterKind, MapAction, MapStore, RemoveExit, Room,
        RoomMutation, RoomSelection, SingleRoomAction, StoreConfig,
    };

    // Collaborators
    pub use atlas_store::{RoomDrawer, RoomFactory, RoomFilter, RoomRecipient, RoomVisitor};
}
