//! Zoning-grid conflict resolution engine.
//!
//! Takes a set of axis-oriented rectangular zoning blocks — one of which may
//! belong to a fixed-footprint parcel — intersects them against road and
//! area obstructions and against each other, and produces, per cell, a
//! consistent set of state flags plus a minimal valid sub-rectangle per
//! block.
//!
//! The engine owns no files, wire formats, or UI: collaborators fill the
//! [`block::DirtyBlocks`] queue, the [`parcels::ParcelRegistry`], the two
//! obstruction indices, and the broad-phase [`overlap::OverlapGroups`]; the
//! engine mutates cell state inside the [`block::ZoneBlockStore`] in place.
//!
//! A cycle runs as three chained passes on `FixedUpdate` (see
//! [`systems::ZoningSet`]): parcel footprint normalization, obstruction
//! scanning, and five-phase overlap resolution per disjoint group.

pub mod block;
pub mod config;
pub mod footprint;
pub mod geometry;
pub mod grid;
pub mod obstructions;
pub mod overlap;
pub mod parcels;
pub mod systems;

pub use block::{BlockId, BlockSize, DirtyBlocks, ZoneBlock, ZoneBlockStore};
pub use grid::{ValidArea, ZoneCell, ZoneType, ZoneTypeMeta};
pub use parcels::{ParcelLot, ParcelRegistry};
pub use systems::{ZoningEnginePlugin, ZoningSet};
