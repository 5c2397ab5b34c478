//! The Atlas room map store.
//!
//! [`MapStore`] holds rooms at unique lattice coordinates, connected by
//! directional exits, behind a single store-wide lock. All room edits are
//! [`MapAction`]s executed through the store.
//!
//! # Selections and claims
//!
//! Callers hold rooms through [`RoomSelection`]s. Each selection carries a
//! token, and the store's [`LockRegistry`] records which tokens reference
//! which rooms. Claims are advisory: they never block a mutation. When a
//! selection is passed to [`MapStore::execute`], its claims are released
//! before the action runs and re-established afterwards for the rooms that
//! still exist, so a selection never ends up holding a deleted room.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`room`] | [`Room`] and [`Exit`] |
//! | [`room_index`] | The owning [`RoomIndex`] arena |
//! | [`locks`] | [`LockRegistry`] |
//! | [`selection`] | [`RoomSelection`] |
//! | [`action`] | [`MapAction`], [`RoomMutation`], [`AddExit`], [`RemoveExit`] |
//! | [`state`] | [`StoreState`], the lock-protected interior |
//! | [`store`] | The [`MapStore`] facade |
//! | [`collab`] | Visitor, factory, recipient, filter and drawer interfaces |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod collab;
pub mod config;
pub mod draw;
pub mod filter;
pub mod locks;
pub mod marker;
pub mod metrics;
pub mod room;
pub mod room_index;
pub mod selection;
pub mod state;
pub mod store;

pub use action::{
    ActionReport, ActionTargets, AddExit, ExitLinkMode, MapAction, RemoveExit, RoomMutation,
    RoomUpdate, SingleRoomAction,
};
pub use collab::{RoomDrawer, RoomFactory, RoomFilter, RoomRecipient, RoomVisitor};
pub use config::{ConfigError, StoreConfig};
pub use draw::DrawStream;
pub use filter::{FieldFilter, FilterKind};
pub use locks::LockRegistry;
pub use marker::{InfoMark, InfoMarkClass, InfoMarkType, MarkerList};
pub use metrics::StoreMetrics;
pub use room::{Exit, Room};
pub use room_index::RoomIndex;
pub use selection::RoomSelection;
pub use state::{Inconsistency, StoreState};
pub use store::MapStore;
