//! Spatial indexing for Atlas maps.
//!
//! This crate defines the [`SpatialIndex`], a sparse three-level ordered
//! mapping from [`Coordinate`](atlas_core::Coordinate) to
//! [`RoomId`](atlas_core::RoomId), together with the deterministic spiral
//! search used to place new rooms.
//!
//! # Layout
//!
//! The map grid is extremely sparse relative to the coordinate space, so the
//! index is a `z → y → x` nesting of `BTreeMap`s. Range queries walk
//! contiguous sub-ranges of each level instead of scanning every room.
//!
//! # Placement
//!
//! [`nearest_free`] walks a [`CoordinateIterator`] outward from an origin
//! until it finds a coordinate with no room.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod index;
pub mod spiral;

pub use bounds::CoordinateBox;
pub use index::SpatialIndex;
pub use spiral::{nearest_free, CoordinateIterator};
