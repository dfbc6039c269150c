//! World and screen coordinates.
//!
//! World coordinates are fixed-point integers: 32 units per tile on x/y,
//! 8 units per height step on z. They never pass through floating point in
//! simulation code, which keeps checksums bit-reproducible across platforms.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::constants::{COORDS_XY_STEP, LOCATION_NULL, MAXIMUM_MAP_SIZE_TECHNICAL};

/// 2D world position (tile plane).
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct CoordsXY {
    /// X component in world units
    pub x: i32,
    /// Y component in world units
    pub y: i32,
}

impl CoordsXY {
    /// Creates a new position
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotates the position about the origin by a view rotation.
    #[must_use]
    pub const fn rotate(self, rotation: Rotation) -> Self {
        match rotation.0 {
            0 => self,
            1 => Self::new(self.y, -self.x),
            2 => Self::new(-self.x, -self.y),
            _ => Self::new(-self.y, self.x),
        }
    }

    /// Returns true if x holds the "not placed" sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.x == LOCATION_NULL
    }
}

impl std::ops::Add for CoordsXY {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Offsets one full tile step in each of the four cardinal directions.
pub const DIRECTION_DELTAS: [CoordsXY; 4] = [
    CoordsXY::new(-COORDS_XY_STEP, 0),
    CoordsXY::new(0, COORDS_XY_STEP),
    CoordsXY::new(COORDS_XY_STEP, 0),
    CoordsXY::new(0, -COORDS_XY_STEP),
];

/// 3D world position.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct CoordsXYZ {
    /// X component in world units
    pub x: i32,
    /// Y component in world units
    pub y: i32,
    /// Z component in world units
    pub z: i32,
}

impl CoordsXYZ {
    /// Creates a new position
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The location every freshly created entity starts at.
    pub const NULL: Self = Self::new(LOCATION_NULL, LOCATION_NULL, 0);

    /// Returns true if x holds the "not placed" sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.x == LOCATION_NULL
    }

    /// Drops the height component.
    #[must_use]
    pub const fn xy(self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }
}

impl From<CoordsXYZ> for CoordsXY {
    fn from(value: CoordsXYZ) -> Self {
        value.xy()
    }
}

/// One of the four isometric view rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    /// Creates a rotation; values wrap modulo 4.
    #[must_use]
    pub const fn new(rotation: u8) -> Self {
        Self(rotation & 3)
    }

    /// Raw rotation index (0-3).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Position in screen space (pixels at zoom level 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct ScreenCoords {
    /// Horizontal pixel
    pub x: i32,
    /// Vertical pixel
    pub y: i32,
}

impl ScreenCoords {
    /// Creates a new screen point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen space, edges inclusive.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct ScreenRect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge
    pub right: i32,
    /// Bottom edge
    pub bottom: i32,
}

impl ScreenRect {
    /// Creates a new rectangle
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Projects a world position onto the screen for the given view rotation.
#[must_use]
pub const fn translate_3d_to_2d(rotation: Rotation, pos: CoordsXYZ) -> ScreenCoords {
    let rotated = pos.xy().rotate(rotation);
    // Arithmetic shift, not division: negative sums must round towards -inf.
    ScreenCoords::new(rotated.y - rotated.x, ((rotated.x + rotated.y) >> 1) - pos.z)
}

/// Playable extent of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapExtent {
    size_tiles: i32,
}

impl MapExtent {
    /// Creates an extent of `size_tiles` x `size_tiles` tiles.
    ///
    /// # Panics
    ///
    /// Panics if `size_tiles` is zero or does not fit the world coordinate range.
    #[must_use]
    pub fn new(size_tiles: usize) -> Self {
        assert!(size_tiles > 0, "Map size must be greater than zero");
        let size_tiles = i32::try_from(size_tiles)
            .ok()
            .filter(|size| *size <= i32::from(u16::MAX) / COORDS_XY_STEP + 1)
            .unwrap_or_else(|| panic!("Map size {size_tiles} exceeds the coordinate range"));
        Self { size_tiles }
    }

    /// Edge length in tiles.
    #[must_use]
    pub const fn size_tiles(self) -> usize {
        self.size_tiles as usize
    }

    /// Edge length in world units.
    #[must_use]
    pub const fn size_units(self) -> i32 {
        self.size_tiles * COORDS_XY_STEP
    }

    /// Returns true if the position lies on the map.
    #[must_use]
    pub const fn is_location_valid(self, pos: CoordsXY) -> bool {
        let limit = self.size_units();
        pos.x >= 0 && pos.x < limit && pos.y >= 0 && pos.y < limit
    }
}

impl Default for MapExtent {
    fn default() -> Self {
        Self {
            size_tiles: MAXIMUM_MAP_SIZE_TECHNICAL as i32,
        }
    }
}
