//! # Entity Records
//!
//! One [`Entity`] per slot. The record splits into two halves that are
//! written by different passes:
//!
//! - **Authoritative state** (`kind`, `location`, `direction`, `data`) is
//!   mutated only by the simulation tick and is what checksums see.
//! - **Visual state** ([`SpriteGeometry`]) is the on-screen footprint. The
//!   tick keeps it in step with `location`, the tweener moves it between
//!   ticks without touching anything authoritative.

use midway_shared::{translate_3d_to_2d, CoordsXYZ, Rotation, ScreenRect};

use crate::serialise::{ByteSink, DataSerialiser, Serialise};

use super::data::EntityData;
use super::id::EntityId;
use super::kind::EntityKind;

/// Default sprite half-width of a new entity.
pub const DEFAULT_SPRITE_WIDTH: u8 = 0x10;
/// Default sprite extent above the projected point.
pub const DEFAULT_SPRITE_HEIGHT_NEGATIVE: u8 = 0x14;
/// Default sprite extent below the projected point.
pub const DEFAULT_SPRITE_HEIGHT_POSITIVE: u8 = 0x08;

/// Screen-space footprint of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteGeometry {
    /// Half-width in pixels.
    pub width: u8,
    /// Pixels above the projected point.
    pub height_negative: u8,
    /// Pixels below the projected point.
    pub height_positive: u8,
    bounds: Option<ScreenRect>,
    visual: CoordsXYZ,
}

impl SpriteGeometry {
    /// Current on-screen rectangle, `None` while not drawn.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Option<ScreenRect> {
        self.bounds
    }

    /// World position the sprite is currently drawn at.
    #[inline]
    #[must_use]
    pub const fn visual_location(&self) -> CoordsXYZ {
        self.visual
    }

    /// Recomputes the footprint for a world position.
    fn place(&mut self, loc: CoordsXYZ, rotation: Rotation) {
        self.visual = loc;
        if loc.is_null() {
            self.bounds = None;
            return;
        }
        let screen = translate_3d_to_2d(rotation, loc);
        self.bounds = Some(ScreenRect::new(
            screen.x - i32::from(self.width),
            screen.y - i32::from(self.height_negative),
            screen.x + i32::from(self.width),
            screen.y + i32::from(self.height_positive),
        ));
    }
}

/// A single entity slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    location: CoordsXYZ,
    direction: u8,
    sprite: SpriteGeometry,
    data: EntityData,
}

impl Entity {
    /// An empty slot: everything zeroed except the id.
    #[must_use]
    pub fn vacant(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::Null,
            location: CoordsXYZ::default(),
            direction: 0,
            sprite: SpriteGeometry::default(),
            data: EntityData::None,
        }
    }

    /// Wipes the slot and initialises it as a fresh, unplaced `kind`.
    pub(crate) fn prepare(&mut self, kind: EntityKind) {
        *self = Self::vacant(self.id);
        self.kind = kind;
        self.data = EntityData::for_kind(kind);
        self.location = CoordsXYZ::NULL;
        self.sprite.width = DEFAULT_SPRITE_WIDTH;
        self.sprite.height_negative = DEFAULT_SPRITE_HEIGHT_NEGATIVE;
        self.sprite.height_positive = DEFAULT_SPRITE_HEIGHT_POSITIVE;
        self.sprite.visual = CoordsXYZ::NULL;
    }

    /// Returns the slot to its vacant state.
    pub(crate) fn clear(&mut self) {
        *self = Self::vacant(self.id);
    }

    /// Slot id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Type tag.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns true unless the slot is free.
    #[inline]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !matches!(self.kind, EntityKind::Null)
    }

    /// Authoritative simulation position.
    #[inline]
    #[must_use]
    pub const fn location(&self) -> CoordsXYZ {
        self.location
    }

    /// Returns true if the entity is on the map.
    #[inline]
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        !self.location.is_null()
    }

    /// Facing direction (0-31, eight steps per quarter turn).
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> u8 {
        self.direction
    }

    /// Sets the facing direction.
    #[inline]
    pub fn set_direction(&mut self, direction: u8) {
        self.direction = direction;
    }

    /// Screen-space footprint.
    #[inline]
    #[must_use]
    pub const fn sprite(&self) -> &SpriteGeometry {
        &self.sprite
    }

    /// Changes the sprite extents. Takes effect on the next move.
    pub fn set_sprite_size(&mut self, width: u8, height_negative: u8, height_positive: u8) {
        self.sprite.width = width;
        self.sprite.height_negative = height_negative;
        self.sprite.height_positive = height_positive;
    }

    /// Kind-specific state.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &EntityData {
        &self.data
    }

    /// Mutable kind-specific state.
    #[inline]
    pub fn data_mut(&mut self) -> &mut EntityData {
        &mut self.data
    }

    /// Writes the authoritative position. Index bookkeeping is the caller's job.
    #[inline]
    pub(crate) fn set_location(&mut self, loc: CoordsXYZ) {
        self.location = loc;
    }

    /// Moves the sprite on screen without touching the simulation position.
    #[inline]
    pub(crate) fn place_sprite(&mut self, loc: CoordsXYZ, rotation: Rotation) {
        self.sprite.place(loc, rotation);
    }
}

impl Serialise for Entity {
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>) {
        // Screen bounds are deliberately absent: they move during tweening.
        stream
            .write_u8(self.kind as u8)
            .write_u16(self.id.get())
            .write_i32(self.location.x)
            .write_i32(self.location.y)
            .write_i32(self.location.z)
            .write_u8(self.direction)
            .write_u8(self.sprite.width)
            .write_u8(self.sprite.height_negative)
            .write_u8(self.sprite.height_positive);
        self.data.serialise(stream);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_resets_everything_but_id() {
        let mut entity = Entity::vacant(EntityId::new(9));
        entity.prepare(EntityKind::Guest);
        entity.set_direction(8);
        entity.set_location(CoordsXYZ::new(100, 100, 16));
        entity.place_sprite(CoordsXYZ::new(100, 100, 16), Rotation::default());

        entity.prepare(EntityKind::Litter);
        assert_eq!(entity.id(), EntityId::new(9));
        assert_eq!(entity.kind(), EntityKind::Litter);
        assert_eq!(entity.location(), CoordsXYZ::NULL);
        assert_eq!(entity.direction(), 0);
        assert_eq!(entity.sprite().bounds(), None);
        assert_eq!(entity.sprite().width, DEFAULT_SPRITE_WIDTH);
        assert!(matches!(entity.data(), EntityData::Litter(_)));
    }

    #[test]
    fn test_sprite_bounds_follow_projection() {
        let mut entity = Entity::vacant(EntityId::new(0));
        entity.prepare(EntityKind::Guest);
        entity.place_sprite(CoordsXYZ::new(64, 64, 16), Rotation::new(0));

        // projected point is (0, 48)
        let bounds = entity.sprite().bounds().unwrap();
        assert_eq!(bounds, ScreenRect::new(-16, 28, 16, 56));
        assert_eq!(entity.sprite().visual_location(), CoordsXYZ::new(64, 64, 16));
        // the simulation position is untouched
        assert_eq!(entity.location(), CoordsXYZ::NULL);
    }

    #[test]
    fn test_null_location_hides_sprite() {
        let mut entity = Entity::vacant(EntityId::new(0));
        entity.prepare(EntityKind::Vehicle);
        entity.place_sprite(CoordsXYZ::new(64, 64, 0), Rotation::new(0));
        assert!(entity.sprite().bounds().is_some());
        entity.place_sprite(CoordsXYZ::NULL, Rotation::new(0));
        assert!(entity.sprite().bounds().is_none());
    }

    #[test]
    fn test_clear_keeps_id() {
        let mut entity = Entity::vacant(EntityId::new(4));
        entity.prepare(EntityKind::Duck);
        entity.clear();
        assert_eq!(entity, Entity::vacant(EntityId::new(4)));
        assert!(!entity.is_alive());
    }
}
