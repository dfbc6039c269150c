//! # Midway Core
//!
//! Entity management and spatial indexing for the Midway park simulation.
//!
//! Every guest, staff member, ride vehicle, piece of litter and short-lived
//! effect lives in one fixed-capacity slot table owned by [`EntityWorld`].
//!
//! ## Architecture Rules
//!
//! 1. **Deterministic** - ids are reused smallest-first and every walk is in
//!    id order, so peers replaying the same commands stay bit-identical
//! 2. **Pre-allocated** - slots, free set and index buckets are sized once
//! 3. **Render state is separate** - tweening moves sprites, never the
//!    positions the simulation and checksums read
//!
//! ## Example
//!
//! ```rust,ignore
//! use midway_core::{EntityConfig, EntityKind, EntityWorld};
//! use midway_shared::CoordsXYZ;
//!
//! let mut world = EntityWorld::new(&EntityConfig::default())?;
//! let guest = world.create(EntityKind::Guest)?;
//! world.move_to(guest, CoordsXYZ::new(320, 320, 16))?;
//!
//! world.pre_tick();
//! // simulation tick
//! world.post_tick();
//! world.tween(0.5);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod checksum;
pub mod config;
pub mod entity;
pub mod error;
pub mod memory;
pub mod serialise;
pub mod spatial;
pub mod tween;
pub mod viewport;
pub mod world;

pub use checksum::{ChecksumStream, EntityChecksum};
pub use config::{EntityConfig, ZoomOverride};
pub use entity::{Entity, EntityCategory, EntityData, EntityId, EntityKind, SpriteGeometry};
pub use error::{ConfigError, EntityError, EntityResult};
pub use memory::{SlotAllocator, SlotClass};
pub use serialise::{ByteSink, DataSerialiser, Serialise};
pub use spatial::{SpatialIndex, SpatialStats};
pub use tween::PositionTweener;
pub use viewport::{InvalidationLog, NoInvalidation, ScreenInvalidator, ZoomTable};
pub use world::{EntityCursor, EntityWorld};
