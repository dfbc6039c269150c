//! # Entities
//!
//! Identifiers, kinds, slot records and per-kind payloads.
//!
//! An entity is an index into a fixed table plus a type tag. Nothing here
//! allocates slots or touches the spatial index; that is the job of
//! [`EntityWorld`](crate::EntityWorld).

mod data;
mod id;
mod kind;
mod lists;
mod record;

pub use data::{
    staff_orders, BalloonData, DuckData, DuckState, EntertainerCostume, EntityData, LitterData,
    LitterType, MoneyEffectData, ParticleData, PeepData, StaffData, StaffType, VehicleData,
};
pub use id::EntityId;
pub use kind::{EntityCategory, EntityKind, KIND_COUNT};
pub use lists::KindLists;
pub use record::{
    Entity, SpriteGeometry, DEFAULT_SPRITE_HEIGHT_NEGATIVE, DEFAULT_SPRITE_HEIGHT_POSITIVE,
    DEFAULT_SPRITE_WIDTH,
};
