//! # Spatial Index
//!
//! Coarse tile grid mapping each map tile to the entities standing on it.
//!
//! ## Layout
//!
//! One bucket per tile, `tile_x * map_size + tile_y`, plus a final bucket for
//! everything that is off the map or not placed. Each bucket keeps its ids
//! ascending so a query returns the same sequence no matter what order the
//! entities arrived in.
//!
//! ## Self repair
//!
//! A remove that does not find its id in the expected bucket means the index
//! and the entity table disagree. Instead of failing, the index logs a
//! warning and rebuilds every bucket from the table.

use midway_shared::{CoordsXY, LOCATION_NULL};

use crate::entity::{Entity, EntityId};

/// World units per tile, as a shift.
const TILE_SHIFT: i32 = 5;
/// Largest coordinate the quantizer accepts before clamping.
const COORD_CLAMP_MAX: i32 = 0xFFFF;

/// Operation counters, for profiling and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpatialStats {
    /// Ids spliced into a bucket.
    pub inserts: u64,
    /// Ids spliced out of a bucket.
    pub removes: u64,
    /// Full rebuilds after a bucket miss.
    pub rebuilds: u64,
}

/// Tile buckets of entity ids.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    buckets: Box<[Vec<EntityId>]>,
    map_size: usize,
    stats: SpatialStats,
}

impl SpatialIndex {
    /// Creates an empty index for a `map_size` x `map_size` tile map.
    ///
    /// # Panics
    ///
    /// Panics if `map_size` is zero.
    #[must_use]
    pub fn new(map_size: usize) -> Self {
        assert!(map_size > 0, "Map size must be greater than zero");
        let count = map_size * map_size + 1;
        Self {
            buckets: (0..count).map(|_| Vec::new()).collect(),
            map_size,
            stats: SpatialStats::default(),
        }
    }

    /// Number of buckets, the null bucket included.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Index of the null bucket.
    #[inline]
    #[must_use]
    pub fn null_bucket(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Operation counters since creation or the last [`reset_stats`](Self::reset_stats).
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> SpatialStats {
        self.stats
    }

    /// Zeroes the operation counters.
    pub fn reset_stats(&mut self) {
        self.stats = SpatialStats::default();
    }

    /// Bucket a world position falls into.
    #[must_use]
    pub fn bucket_of(&self, loc: CoordsXY) -> usize {
        if loc.x == LOCATION_NULL {
            return self.null_bucket();
        }
        let tile_x = tile_of(loc.x);
        let tile_y = tile_of(loc.y);
        if tile_x >= self.map_size || tile_y >= self.map_size {
            return self.null_bucket();
        }
        tile_x * self.map_size + tile_y
    }

    /// Ids in the bucket for `loc`, ascending.
    #[inline]
    #[must_use]
    pub fn query(&self, loc: CoordsXY) -> &[EntityId] {
        &self.buckets[self.bucket_of(loc)]
    }

    /// Ids in bucket `index`, ascending. Empty for an out of range index.
    #[must_use]
    pub fn bucket(&self, index: usize) -> &[EntityId] {
        self.buckets.get(index).map_or(&[][..], Vec::as_slice)
    }

    /// Adds `id` at `loc`. An id already present in that bucket is left alone.
    pub fn insert(&mut self, id: EntityId, loc: CoordsXY) {
        let bucket = self.bucket_of(loc);
        self.insert_into(bucket, id);
    }

    /// Removes `id` from the bucket for `loc`.
    ///
    /// On a miss the whole index is rebuilt from `entities`, leaving `id` out.
    pub fn remove(&mut self, id: EntityId, loc: CoordsXY, entities: &[Entity]) {
        let bucket = self.bucket_of(loc);
        let list = &mut self.buckets[bucket];
        if let Ok(pos) = list.binary_search(&id) {
            list.remove(pos);
            self.stats.removes += 1;
            return;
        }

        tracing::warn!(
            entity = %id,
            bucket,
            "Entity missing from its spatial bucket, rebuilding index"
        );
        self.rebuild(entities, id);
    }

    /// Moves `id` from the bucket for `old` to the bucket for `new`.
    ///
    /// Does nothing when both positions share a bucket.
    pub fn relocate(&mut self, id: EntityId, old: CoordsXY, new: CoordsXY, entities: &[Entity]) {
        let new_bucket = self.bucket_of(new);
        if self.bucket_of(old) == new_bucket {
            return;
        }
        self.remove(id, old, entities);
        self.insert_into(new_bucket, id);
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
    }

    /// Rebuilds every bucket from the live entities, except `skip`.
    pub fn rebuild(&mut self, entities: &[Entity], skip: EntityId) {
        self.clear();
        // Walking the table in slot order keeps every bucket sorted.
        for entity in entities.iter().filter(|e| e.is_alive() && e.id() != skip) {
            let bucket = self.bucket_of(entity.location().xy());
            self.buckets[bucket].push(entity.id());
        }
        self.stats.rebuilds += 1;
    }

    #[cfg(test)]
    pub(crate) fn bucket_mut(&mut self, index: usize) -> &mut Vec<EntityId> {
        &mut self.buckets[index]
    }

    fn insert_into(&mut self, bucket: usize, id: EntityId) {
        let list = &mut self.buckets[bucket];
        if let Err(pos) = list.binary_search(&id) {
            list.insert(pos, id);
            self.stats.inserts += 1;
        }
    }
}

fn tile_of(coord: i32) -> usize {
    // Clamped to 0..=0xFFFF so the shift result is non-negative.
    (coord.clamp(0, COORD_CLAMP_MAX) >> TILE_SHIFT).unsigned_abs() as usize
}

#[cfg(test)]
mod tests {
    use midway_shared::CoordsXYZ;

    use super::*;
    use crate::entity::EntityKind;

    fn id(raw: u16) -> EntityId {
        EntityId::new(raw)
    }

    /// A table where slot `i` holds a guest at `locs[i]`.
    fn table(locs: &[CoordsXYZ]) -> Vec<Entity> {
        locs.iter()
            .enumerate()
            .map(|(i, loc)| {
                let mut entity = Entity::vacant(EntityId::from_index(i).unwrap());
                entity.prepare(EntityKind::Guest);
                entity.set_location(*loc);
                entity
            })
            .collect()
    }

    #[test]
    fn test_quantization() {
        let index = SpatialIndex::new(256);
        assert_eq!(index.bucket_count(), 256 * 256 + 1);
        assert_eq!(index.bucket_of(CoordsXY::new(0, 0)), 0);
        assert_eq!(index.bucket_of(CoordsXY::new(31, 31)), 0);
        assert_eq!(index.bucket_of(CoordsXY::new(0, 32)), 1);
        assert_eq!(index.bucket_of(CoordsXY::new(32, 0)), 256);
        // negative coordinates clamp onto the first tile row
        assert_eq!(index.bucket_of(CoordsXY::new(-5, 40)), 1);
        assert_eq!(index.bucket_of(CoordsXYZ::NULL.xy()), index.null_bucket());
    }

    #[test]
    fn test_off_map_goes_to_null_bucket() {
        let index = SpatialIndex::new(4);
        assert_eq!(index.bucket_of(CoordsXY::new(127, 127)), 15);
        assert_eq!(index.bucket_of(CoordsXY::new(128, 0)), index.null_bucket());
        assert_eq!(index.bucket_of(CoordsXY::new(0, 100_000)), index.null_bucket());
    }

    #[test]
    fn test_buckets_are_sorted() {
        let mut index = SpatialIndex::new(8);
        let here = CoordsXY::new(40, 40);
        for raw in [9, 3, 6, 3] {
            index.insert(id(raw), here);
        }
        assert_eq!(index.query(here), &[id(3), id(6), id(9)]);
        assert_eq!(index.stats().inserts, 3);
    }

    #[test]
    fn test_relocate_within_bucket_is_free() {
        let locs = [CoordsXYZ::new(40, 40, 0)];
        let entities = table(&locs);
        let mut index = SpatialIndex::new(8);
        index.insert(id(0), locs[0].xy());
        index.reset_stats();

        index.relocate(id(0), CoordsXY::new(40, 40), CoordsXY::new(41, 40), &entities);
        assert_eq!(index.stats(), SpatialStats::default());

        index.relocate(id(0), CoordsXY::new(41, 40), CoordsXY::new(80, 40), &entities);
        assert_eq!(index.stats().removes, 1);
        assert_eq!(index.stats().inserts, 1);
        assert_eq!(index.query(CoordsXY::new(80, 40)), &[id(0)]);
        assert!(index.query(CoordsXY::new(40, 40)).is_empty());
    }

    #[test]
    fn test_bucket_miss_rebuilds() {
        let locs = [
            CoordsXYZ::new(10, 10, 0),
            CoordsXYZ::new(100, 10, 0),
            CoordsXYZ::new(10, 10, 0),
            CoordsXYZ::NULL,
        ];
        let entities = table(&locs);
        let mut index = SpatialIndex::new(8);
        for entity in &entities {
            index.insert(entity.id(), entity.location().xy());
        }

        // corrupt: drop id 2 from its bucket
        let bucket = index.bucket_of(locs[2].xy());
        index.bucket_mut(bucket).retain(|e| *e != id(2));

        index.remove(id(2), locs[2].xy(), &entities);
        assert_eq!(index.stats().rebuilds, 1);
        assert_eq!(index.query(locs[0].xy()), &[id(0)]);
        assert_eq!(index.query(locs[1].xy()), &[id(1)]);
        assert_eq!(index.bucket(index.null_bucket()), &[id(3)]);
    }
}
