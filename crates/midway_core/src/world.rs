//! # Entity World
//!
//! The central container for every entity in a park.
//!
//! Owns the slot table, the slot allocator, the per-kind membership lists,
//! the spatial index and the tweener, and keeps all of them in agreement.
//! Every structural change goes through here; nothing else mutates those
//! structures.
//!
//! ## Invariants
//! - A slot is free in the allocator iff its entity kind is `Null`
//! - A live entity is in exactly one membership list and one spatial bucket
//! - Lists and buckets are sorted by id

use midway_shared::{CoordsXY, CoordsXYZ, MapExtent, Rotation, DIRECTION_DELTAS, LOCATION_NULL};

use crate::checksum::{self, EntityChecksum};
use crate::config::EntityConfig;
use crate::entity::{Entity, EntityData, EntityId, EntityKind, KindLists, LitterData, LitterType};
use crate::error::{ConfigError, EntityError, EntityResult};
use crate::memory::{SlotAllocator, SlotClass};
use crate::serialise::{ByteSink, DataSerialiser};
use crate::spatial::SpatialIndex;
use crate::tween::PositionTweener;
use crate::viewport::{NoInvalidation, ScreenInvalidator, ZoomTable};

/// Litter sprite extents.
const LITTER_SPRITE: (u8, u8, u8) = (6, 6, 3);
/// Litter lands one eighth of a tile ahead of whoever dropped it.
const LITTER_OFFSET_DIVISOR: i32 = 8;
/// Horizontal reach of [`EntityWorld::remove_litter_at`].
const LITTER_SWEEP_XY: i32 = 8;
/// Vertical reach of [`EntityWorld::remove_litter_at`].
const LITTER_SWEEP_Z: i32 = 16;

fn slot_class(kind: EntityKind) -> SlotClass {
    if kind.is_misc() {
        SlotClass::Misc
    } else {
        SlotClass::Gameplay
    }
}

/// Every entity of one park, plus the indexes over them.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = EntityWorld::new(&EntityConfig::default())?;
///
/// let guest = world.create(EntityKind::Guest)?;
/// world.move_to(guest, CoordsXYZ::new(320, 320, 16))?;
/// assert_eq!(world.entities_on_tile(CoordsXY::new(320, 320)), &[guest]);
/// ```
pub struct EntityWorld<I: ScreenInvalidator = NoInvalidation> {
    entities: Box<[Entity]>,
    slots: SlotAllocator,
    lists: KindLists,
    spatial: SpatialIndex,
    tweener: PositionTweener,
    flashing: Box<[bool]>,
    zoom: ZoomTable,
    rotation: Rotation,
    map: MapExtent,
    max_litter: usize,
    invalidator: I,
}

impl EntityWorld {
    /// Creates an empty world that discards screen invalidations.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: &EntityConfig) -> Result<Self, ConfigError> {
        Self::with_invalidator(config, NoInvalidation)
    }
}

impl<I: ScreenInvalidator> EntityWorld<I> {
    /// Creates an empty world reporting sprite changes to `invalidator`.
    ///
    /// All memory is allocated here.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` fails validation.
    pub fn with_invalidator(config: &EntityConfig, invalidator: I) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.capacity;

        let entities = (0..capacity)
            .filter_map(EntityId::from_index)
            .map(Entity::vacant)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            entities,
            slots: SlotAllocator::new(capacity, config.max_misc_entities),
            lists: KindLists::new(),
            spatial: SpatialIndex::new(config.map_size_tiles),
            tweener: PositionTweener::new(),
            flashing: vec![false; capacity].into_boxed_slice(),
            zoom: config.zoom_table(),
            rotation: Rotation::default(),
            map: config.map_extent(),
            max_litter: config.max_litter,
            invalidator,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of entity slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Number of free slots.
    #[inline]
    #[must_use]
    pub const fn free_count(&self) -> usize {
        self.slots.free_count()
    }

    /// Number of live entities of `kind`.
    #[inline]
    #[must_use]
    pub fn count_by_kind(&self, kind: EntityKind) -> usize {
        self.lists.count(kind)
    }

    /// Number of live misc (transient effect) entities.
    #[must_use]
    pub fn misc_entity_count(&self) -> usize {
        EntityKind::MISC.iter().map(|kind| self.lists.count(*kind)).sum()
    }

    /// Live ids of `kind`, ascending.
    #[inline]
    #[must_use]
    pub fn ids(&self, kind: EntityKind) -> &[EntityId] {
        self.lists.ids(kind)
    }

    /// Live entities of `kind`, ascending id.
    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.lists
            .ids(kind)
            .iter()
            .map(move |id| &self.entities[id.index()])
    }

    /// A cursor over `kind` that tolerates the world changing between steps.
    #[must_use]
    pub fn cursor(&self, kind: EntityKind) -> EntityCursor {
        EntityCursor::new(kind)
    }

    /// Looks up a live entity.
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] or [`EntityError::NotAlive`].
    pub fn get(&self, id: EntityId) -> EntityResult<&Entity> {
        self.check_alive(id)?;
        Ok(&self.entities[id.index()])
    }

    /// Looks up a live entity for mutation of its direction, sprite size and payload.
    ///
    /// Position changes go through [`move_to`](Self::move_to).
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] or [`EntityError::NotAlive`].
    pub fn get_mut(&mut self, id: EntityId) -> EntityResult<&mut Entity> {
        self.check_alive(id)?;
        Ok(&mut self.entities[id.index()])
    }

    /// Every slot, live or not, in id order.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[Entity] {
        &self.entities
    }

    /// Ids whose position falls on the same tile as `loc`, ascending.
    #[inline]
    #[must_use]
    pub fn entities_on_tile(&self, loc: CoordsXY) -> &[EntityId] {
        self.spatial.query(loc)
    }

    /// Entities of `kind` on the same tile as `loc`, ascending id.
    pub fn entities_on_tile_of_kind(
        &self,
        loc: CoordsXY,
        kind: EntityKind,
    ) -> impl Iterator<Item = &Entity> + '_ {
        self.spatial
            .query(loc)
            .iter()
            .map(move |id| &self.entities[id.index()])
            .filter(move |entity| entity.kind() == kind)
    }

    /// The spatial index.
    #[inline]
    #[must_use]
    pub const fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Zeroes the spatial index operation counters.
    pub fn reset_spatial_stats(&mut self) {
        self.spatial.reset_stats();
    }

    /// The tweener.
    #[inline]
    #[must_use]
    pub const fn tweener(&self) -> &PositionTweener {
        &self.tweener
    }

    /// The slot allocator.
    #[inline]
    #[must_use]
    pub const fn allocator(&self) -> &SlotAllocator {
        &self.slots
    }

    /// Playable map extent.
    #[inline]
    #[must_use]
    pub const fn map(&self) -> MapExtent {
        self.map
    }

    /// The invalidation receiver.
    #[inline]
    #[must_use]
    pub const fn invalidator(&self) -> &I {
        &self.invalidator
    }

    /// Mutable access to the invalidation receiver.
    #[inline]
    pub fn invalidator_mut(&mut self) -> &mut I {
        &mut self.invalidator
    }

    /// Current view rotation.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Frees every slot and empties every index.
    ///
    /// Afterwards ids are handed out again from 0.
    pub fn reset_all(&mut self) {
        for entity in self.entities.iter_mut() {
            entity.clear();
        }
        self.slots.reset();
        self.lists.clear();
        self.spatial.clear();
        self.tweener.clear();
        self.flashing.fill(false);
        tracing::info!(capacity = self.capacity(), "Entity world reset");
    }

    /// Creates an unplaced entity of `kind` in the smallest free slot.
    ///
    /// # Errors
    ///
    /// [`EntityError::Exhausted`] when no slot may be used, and
    /// [`EntityError::InvalidKind`] for [`EntityKind::Null`].
    pub fn create(&mut self, kind: EntityKind) -> EntityResult<EntityId> {
        if kind == EntityKind::Null {
            return Err(EntityError::InvalidKind(kind));
        }
        let id = self.slots.allocate(slot_class(kind)).map_err(|err| {
            tracing::debug!(?kind, %err, "Entity creation refused");
            err
        })?;
        self.init_slot(id, kind);
        Ok(id)
    }

    /// Creates an unplaced entity of `kind` in a specific slot.
    ///
    /// Used to replay creation from a peer; the misc reservation does not apply.
    ///
    /// # Errors
    ///
    /// [`EntityError::Conflict`] if the slot is taken, [`EntityError::OutOfRange`]
    /// if it does not exist and [`EntityError::InvalidKind`] for
    /// [`EntityKind::Null`].
    pub fn create_at(&mut self, id: EntityId, kind: EntityKind) -> EntityResult<EntityId> {
        if kind == EntityKind::Null {
            return Err(EntityError::InvalidKind(kind));
        }
        self.slots.allocate_at(id, slot_class(kind)).map_err(|err| {
            tracing::debug!(?kind, %err, "Entity replay refused");
            err
        })?;
        self.init_slot(id, kind);
        Ok(id)
    }

    fn init_slot(&mut self, id: EntityId, kind: EntityKind) {
        let index = id.index();
        self.entities[index].prepare(kind);
        self.flashing[index] = false;
        self.lists.insert(kind, id);
        self.spatial.insert(id, CoordsXYZ::NULL.xy());
        tracing::trace!(entity = %id, ?kind, "Entity created");
    }

    /// Destroys a live entity and frees its slot.
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] or [`EntityError::NotAlive`], and
    /// [`EntityError::AlreadyFree`] if the allocator disagrees, in which case
    /// the entity is left as it was.
    pub fn destroy(&mut self, id: EntityId) -> EntityResult<()> {
        self.check_alive(id)?;
        let index = id.index();
        let kind = self.entities[index].kind();
        let loc = self.entities[index].location();

        self.slots.release(id, slot_class(kind))?;
        self.flashing[index] = false;
        self.tweener.remove_entity(id, kind);
        self.lists.remove(kind, id);
        self.spatial.remove(id, loc.xy(), &self.entities);
        self.entities[index].clear();
        tracing::trace!(entity = %id, ?kind, "Entity destroyed");
        Ok(())
    }

    /// Moves an entity to `loc`.
    ///
    /// A position off the map is stored with x set to `LOCATION_NULL`, which
    /// unplaces the entity. The old screen rectangle is invalidated, the
    /// spatial index updated, the sprite recomputed and the new rectangle
    /// invalidated, in that order.
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] or [`EntityError::NotAlive`].
    pub fn move_to(&mut self, id: EntityId, loc: CoordsXYZ) -> EntityResult<()> {
        self.check_alive(id)?;
        let index = id.index();
        let old = self.entities[index].location();

        if self.entities[index].is_placed() {
            self.invalidate_sprite(index);
        }

        let new = if self.map.is_location_valid(loc.xy()) {
            loc
        } else {
            CoordsXYZ::new(LOCATION_NULL, loc.y, loc.z)
        };

        self.spatial.relocate(id, old.xy(), new.xy(), &self.entities);

        let rotation = self.rotation;
        let entity = &mut self.entities[index];
        entity.set_location(new);
        entity.place_sprite(new, rotation);

        if !new.is_null() {
            self.invalidate_sprite(index);
        }
        Ok(())
    }

    // =========================================================================
    // Flashing
    // =========================================================================

    /// Marks an entity as highlighted (or not) by the renderer.
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] or [`EntityError::NotAlive`].
    pub fn set_flashing(&mut self, id: EntityId, flashing: bool) -> EntityResult<()> {
        self.check_alive(id)?;
        self.flashing[id.index()] = flashing;
        Ok(())
    }

    /// Returns true if `id` is a live, highlighted entity.
    #[must_use]
    pub fn is_flashing(&self, id: EntityId) -> bool {
        self.flashing.get(id.index()).copied().unwrap_or(false)
    }

    // =========================================================================
    // Litter and sweeps
    // =========================================================================

    /// Drops a piece of litter just ahead of `pos` in `direction`.
    ///
    /// Once `max_litter` pieces exist, the most recently dropped one is
    /// recycled first. Returns `None`, touching nothing, when the litter
    /// would land off the map.
    ///
    /// # Errors
    ///
    /// [`EntityError::Exhausted`] if no slot is free.
    pub fn spawn_litter(
        &mut self,
        pos: CoordsXYZ,
        direction: u8,
        litter_type: LitterType,
        tick: u32,
    ) -> EntityResult<Option<EntityId>> {
        let delta = DIRECTION_DELTAS[usize::from((direction >> 3) & 3)];
        let target = CoordsXYZ::new(
            pos.x + delta.x / LITTER_OFFSET_DIVISOR,
            pos.y + delta.y / LITTER_OFFSET_DIVISOR,
            pos.z,
        );
        if !self.map.is_location_valid(target.xy()) {
            return Ok(None);
        }

        if self.count_by_kind(EntityKind::Litter) >= self.max_litter {
            // Ties go to the highest id.
            let newest = self
                .iter_kind(EntityKind::Litter)
                .max_by_key(|litter| match litter.data() {
                    EntityData::Litter(data) => data.creation_tick,
                    _ => 0,
                })
                .map(Entity::id);
            if let Some(newest) = newest {
                self.destroy(newest)?;
            }
        }

        let id = self.create(EntityKind::Litter)?;
        let entity = &mut self.entities[id.index()];
        entity.set_direction(direction);
        let (width, height_negative, height_positive) = LITTER_SPRITE;
        entity.set_sprite_size(width, height_negative, height_positive);
        *entity.data_mut() = EntityData::Litter(LitterData {
            litter_type,
            creation_tick: tick,
        });
        self.move_to(id, target)?;
        Ok(Some(id))
    }

    /// Picks up every piece of litter within reach of `pos`.
    ///
    /// Returns the number removed.
    pub fn remove_litter_at(&mut self, pos: CoordsXYZ) -> usize {
        let removals: Vec<EntityId> = self
            .entities_on_tile_of_kind(pos.xy(), EntityKind::Litter)
            .filter(|litter| {
                let at = litter.location();
                (at.z - pos.z).abs() <= LITTER_SWEEP_Z
                    && (at.x - pos.x).abs() <= LITTER_SWEEP_XY
                    && (at.y - pos.y).abs() <= LITTER_SWEEP_XY
            })
            .map(Entity::id)
            .collect();

        let mut removed = 0;
        for id in removals {
            if self.destroy(id).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Destroys balloons, airborne ducks and money effects.
    ///
    /// Returns the number removed.
    pub fn remove_floating_entities(&mut self) -> usize {
        let mut removed = 0;
        for kind in [EntityKind::Balloon, EntityKind::Duck, EntityKind::MoneyEffect] {
            let mut cursor = self.cursor(kind);
            while let Some(id) = cursor.advance(self) {
                let floating = match self.entities[id.index()].data() {
                    EntityData::Duck(duck) => duck.is_flying(),
                    _ => true,
                };
                if floating && self.destroy(id).is_ok() {
                    removed += 1;
                }
            }
        }
        tracing::debug!(removed, "Removed floating entities");
        removed
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Switches the view rotation and recomputes every sprite's bounds.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        if rotation == self.rotation {
            return;
        }
        self.rotation = rotation;
        for index in 0..self.entities.len() {
            let visual = self.entities[index].sprite().visual_location();
            if self.entities[index].is_alive() && !visual.is_null() {
                self.show_at(index, visual);
            }
        }
    }

    // =========================================================================
    // Tweening
    // =========================================================================

    /// Puts every tweened sprite back on its tick position and snapshots
    /// the pre-tick positions of all guests, staff and vehicles.
    ///
    /// Call before each simulation tick.
    pub fn pre_tick(&mut self) {
        for i in 0..self.tweener.len() {
            let Some(id) = self.tweener.entity_at(i) else {
                continue;
            };
            let index = id.index();
            let Some(entity) = self.entities.get(index).filter(|e| e.is_alive()) else {
                continue;
            };
            let loc = entity.location();
            if entity.sprite().visual_location() != loc {
                self.show_at(index, loc);
            }
        }

        self.tweener.clear();
        for kind in EntityKind::TWEENED {
            for id in self.lists.ids(kind) {
                self.tweener
                    .track(*id, self.entities[id.index()].location());
            }
        }
    }

    /// Snapshots the post-tick positions. Call after each simulation tick.
    pub fn post_tick(&mut self) {
        let entities = &self.entities;
        self.tweener.record_post(|id| {
            entities
                .get(id.index())
                .map_or(CoordsXYZ::NULL, Entity::location)
        });
    }

    /// Draws every moving tweened entity at `alpha` of the way through the tick.
    ///
    /// Only sprites move: simulation positions, the spatial index and
    /// checksums are unaffected.
    pub fn tween(&mut self, alpha: f32) {
        if !self.tweener.is_aligned() {
            if !self.tweener.is_empty() {
                tracing::warn!(
                    tracked = self.tweener.len(),
                    "Tween requested before post-tick snapshot, skipping"
                );
            }
            return;
        }
        for i in 0..self.tweener.len() {
            if let Some((id, pos)) = self.tweener.target(i, alpha) {
                let index = id.index();
                if self.entities.get(index).is_some_and(Entity::is_alive) {
                    self.show_at(index, pos);
                }
            }
        }
    }

    // =========================================================================
    // Serialisation
    // =========================================================================

    /// Digest of all guests, staff, vehicles and litter.
    #[must_use]
    pub fn checksum(&self) -> EntityChecksum {
        checksum::compute(&self.entities, &self.lists)
    }

    /// Writes every entity of `kind` to `stream`, ascending id.
    pub fn serialise_kind<S: ByteSink>(&self, kind: EntityKind, stream: &mut DataSerialiser<'_, S>) {
        checksum::serialise_kind(&self.entities, &self.lists, kind, stream);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_alive(&self, id: EntityId) -> EntityResult<()> {
        let entity = self
            .entities
            .get(id.index())
            .filter(|_| !id.is_null())
            .ok_or(EntityError::OutOfRange {
                id,
                capacity: self.entities.len(),
            })?;
        if !entity.is_alive() {
            return Err(EntityError::NotAlive(id));
        }
        Ok(())
    }

    fn invalidate_sprite(&mut self, index: usize) {
        let entity = &self.entities[index];
        if let Some(rect) = entity.sprite().bounds() {
            self.invalidator
                .invalidate_region(rect, self.zoom.get(entity.kind()));
        }
    }

    /// Moves a sprite on screen only.
    fn show_at(&mut self, index: usize, loc: CoordsXYZ) {
        self.invalidate_sprite(index);
        self.entities[index].place_sprite(loc, self.rotation);
        self.invalidate_sprite(index);
    }
}

/// Walks one kind's membership list while the world is being mutated.
///
/// Each step returns the smallest live id of the kind above the last one
/// returned, so destroying the current entity, or any other, never skips
/// or repeats an entity that is still alive.
#[derive(Clone, Copy, Debug)]
pub struct EntityCursor {
    kind: EntityKind,
    last: EntityId,
}

impl EntityCursor {
    /// A cursor positioned before the first entity of `kind`.
    #[must_use]
    pub const fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            last: EntityId::NULL,
        }
    }

    /// Kind being walked.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Next live id, or `None` once the list is exhausted.
    pub fn advance<I: ScreenInvalidator>(&mut self, world: &EntityWorld<I>) -> Option<EntityId> {
        let next = world.lists.next_after(self.kind, self.last)?;
        self.last = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::InvalidationLog;

    fn small_world(capacity: usize) -> EntityWorld {
        let config = EntityConfig {
            capacity,
            max_misc_entities: 0,
            ..EntityConfig::default()
        };
        EntityWorld::new(&config).unwrap()
    }

    #[test]
    fn test_create_is_unplaced_in_null_bucket() {
        let mut world = small_world(4);
        let id = world.create(EntityKind::Guest).unwrap();
        let entity = world.get(id).unwrap();
        assert_eq!(entity.location(), CoordsXYZ::NULL);
        assert!(entity.sprite().bounds().is_none());
        assert_eq!(
            world.spatial().bucket(world.spatial().null_bucket()),
            &[id]
        );
    }

    #[test]
    fn test_null_kind_rejected() {
        let mut world = small_world(4);
        assert_eq!(
            world.create(EntityKind::Null),
            Err(EntityError::InvalidKind(EntityKind::Null))
        );
        assert_eq!(world.free_count(), 4);
    }

    #[test]
    fn test_move_off_map_unplaces() {
        let mut world = small_world(4);
        let id = world.create(EntityKind::Staff).unwrap();
        world.move_to(id, CoordsXYZ::new(100, 100, 0)).unwrap();
        world.move_to(id, CoordsXYZ::new(100, 9000, 8)).unwrap();
        let entity = world.get(id).unwrap();
        assert_eq!(entity.location(), CoordsXYZ::new(LOCATION_NULL, 9000, 8));
        assert!(!entity.is_placed());
        assert!(world.entities_on_tile(CoordsXY::new(100, 100)).is_empty());
    }

    #[test]
    fn test_move_invalidates_old_then_new() {
        let config = EntityConfig {
            capacity: 16,
            max_misc_entities: 4,
            ..EntityConfig::default()
        };
        let mut world = EntityWorld::with_invalidator(&config, InvalidationLog::default()).unwrap();
        let id = world.create(EntityKind::Duck).unwrap();

        world.move_to(id, CoordsXYZ::new(64, 64, 16)).unwrap();
        // unplaced before: only the new rect
        assert_eq!(world.invalidator().regions.len(), 1);
        let first = world.get(id).unwrap().sprite().bounds().unwrap();
        assert_eq!(world.invalidator().regions[0], (first, 1));

        world.invalidator_mut().clear();
        world.move_to(id, CoordsXYZ::new(96, 64, 16)).unwrap();
        let second = world.get(id).unwrap().sprite().bounds().unwrap();
        assert_eq!(world.invalidator().regions, vec![(first, 1), (second, 1)]);
    }

    #[test]
    fn test_destroy_requests_no_redraw() {
        let config = EntityConfig {
            capacity: 16,
            max_misc_entities: 4,
            ..EntityConfig::default()
        };
        let mut world = EntityWorld::with_invalidator(&config, InvalidationLog::default()).unwrap();
        let id = world.create(EntityKind::Guest).unwrap();
        world.move_to(id, CoordsXYZ::new(64, 64, 0)).unwrap();
        world.invalidator_mut().clear();

        world.destroy(id).unwrap();
        assert!(world.invalidator().regions.is_empty());
    }

    #[test]
    fn test_failed_destroy_leaves_entity_attached() {
        let mut world = small_world(4);
        let id = world.create(EntityKind::Guest).unwrap();
        world.move_to(id, CoordsXYZ::new(40, 40, 0)).unwrap();
        world.set_flashing(id, true).unwrap();
        world.pre_tick();

        // a slot the allocator already considers free
        world.slots.release(id, SlotClass::Gameplay).unwrap();
        assert_eq!(world.destroy(id), Err(EntityError::AlreadyFree(id)));

        assert!(world.is_flashing(id));
        assert!(world.tweener().is_tracking(id));
        assert_eq!(world.ids(EntityKind::Guest), &[id]);
        assert_eq!(world.entities_on_tile(CoordsXY::new(40, 40)), &[id]);
        assert!(world.get(id).is_ok());
    }

    #[test]
    fn test_destroy_clears_everything() {
        let mut world = small_world(4);
        let id = world.create(EntityKind::Guest).unwrap();
        world.move_to(id, CoordsXYZ::new(40, 40, 0)).unwrap();
        world.set_flashing(id, true).unwrap();
        world.pre_tick();

        world.destroy(id).unwrap();
        assert!(!world.is_flashing(id));
        assert!(!world.tweener().is_tracking(id));
        assert_eq!(world.count_by_kind(EntityKind::Guest), 0);
        assert!(world.entities_on_tile(CoordsXY::new(40, 40)).is_empty());
        assert_eq!(world.slots()[id.index()], Entity::vacant(id));
        assert_eq!(world.destroy(id), Err(EntityError::NotAlive(id)));
    }

    #[test]
    fn test_out_of_range_ids() {
        let mut world = small_world(4);
        assert!(matches!(
            world.get(EntityId::new(4)),
            Err(EntityError::OutOfRange { capacity: 4, .. })
        ));
        assert!(matches!(
            world.move_to(EntityId::NULL, CoordsXYZ::new(0, 0, 0)),
            Err(EntityError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_destroy_repairs_corrupt_bucket() {
        let mut world = small_world(8);
        let a = world.create(EntityKind::Guest).unwrap();
        let b = world.create(EntityKind::Guest).unwrap();
        world.move_to(a, CoordsXYZ::new(10, 10, 0)).unwrap();
        world.move_to(b, CoordsXYZ::new(10, 10, 0)).unwrap();

        let bucket = world.spatial.bucket_of(CoordsXY::new(10, 10));
        world.spatial.bucket_mut(bucket).clear();

        world.destroy(a).unwrap();
        assert_eq!(world.spatial().stats().rebuilds, 1);
        assert_eq!(world.entities_on_tile(CoordsXY::new(10, 10)), &[b]);
    }

    #[test]
    fn test_cursor_survives_destruction() {
        let mut world = small_world(8);
        for _ in 0..5 {
            world.create(EntityKind::Litter).unwrap();
        }
        let mut seen = Vec::new();
        let mut cursor = world.cursor(EntityKind::Litter);
        while let Some(id) = cursor.advance(&world) {
            seen.push(id.get());
            world.destroy(id).unwrap();
            if id.get() == 1 {
                // destroying an entity ahead of the cursor drops it from the walk
                world.destroy(EntityId::new(3)).unwrap();
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 4]);
        assert_eq!(world.count_by_kind(EntityKind::Litter), 0);
    }

    #[test]
    fn test_set_rotation_recomputes_bounds() {
        let mut world = small_world(4);
        let id = world.create(EntityKind::Guest).unwrap();
        world.move_to(id, CoordsXYZ::new(320, 64, 0)).unwrap();
        let before = world.get(id).unwrap().sprite().bounds();
        world.set_rotation(Rotation::new(2));
        let after = world.get(id).unwrap().sprite().bounds();
        assert_ne!(before, after);
        assert_eq!(world.get(id).unwrap().location(), CoordsXYZ::new(320, 64, 0));
    }
}
