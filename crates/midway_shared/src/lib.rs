//! # Midway Shared
//!
//! Plain data shared by the simulation core and the renderer:
//! - World and screen coordinate types
//! - The isometric projection used for sprite bounding boxes
//! - Policy constants that every peer in a session must agree on
//!
//! ## CRITICAL RULE
//!
//! Nothing in this crate may hold simulation state. If it changes during a
//! tick, it belongs in `midway_core`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod coords;

pub use constants::{
    COORDS_XY_STEP, COORDS_Z_STEP, LOCATION_NULL, MAXIMUM_MAP_SIZE_TECHNICAL, MAX_ENTITIES,
    MAX_LITTER, MAX_MISC_ENTITIES,
};
pub use coords::{
    translate_3d_to_2d, CoordsXY, CoordsXYZ, MapExtent, Rotation, ScreenCoords, ScreenRect,
    DIRECTION_DELTAS,
};
