//! # Simulation Constants
//!
//! Policy values baked into the simulation.
//!
//! **CRITICAL:** Peers in a networked session must agree on every value in
//! this file. Changing one is a protocol break.

// =============================================================================
// ENTITY LIMITS
// =============================================================================

/// Default number of entity slots in the world.
pub const MAX_ENTITIES: usize = 10_000;

/// Soft cap on transient "misc" effect entities (particles, balloons, ducks...).
///
/// Misc entities are refused once this many exist, and are also refused when
/// granting one would eat into the slots kept back for gameplay entities.
pub const MAX_MISC_ENTITIES: usize = 300;

/// Litter count at which new litter starts evicting existing litter.
pub const MAX_LITTER: usize = 500;

// =============================================================================
// MAP GEOMETRY
// =============================================================================

/// Sentinel x coordinate meaning "not placed on the map".
pub const LOCATION_NULL: i32 = -32_768;

/// World units per map tile on the x and y axes.
pub const COORDS_XY_STEP: i32 = 32;

/// World units per height step on the z axis.
pub const COORDS_Z_STEP: i32 = 8;

/// Largest map edge, in tiles, the spatial index is laid out for.
pub const MAXIMUM_MAP_SIZE_TECHNICAL: usize = 256;
