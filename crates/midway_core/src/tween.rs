//! # Position Tweening
//!
//! Smooths entity motion when the renderer runs faster than the simulation.
//!
//! ## Architecture
//! - **Authoritative position**: where the entity IS at a tick boundary.
//!   Collision, the spatial index and checksums only ever see this.
//! - **Visual position**: where the sprite is drawn. Between ticks it is
//!   blended from the pre-tick snapshot to the post-tick snapshot.
//!
//! ## Frame sequence
//! ```text
//! pre_tick()   restore sprites, snapshot positions   (pre)
//! <simulation tick>
//! post_tick()  snapshot positions again              (post)
//! tween(a)     draw at round(post * a + pre * (1 - a)), any number of times
//! ```
//!
//! The tweener only stores ids and positions. [`EntityWorld`](crate::EntityWorld)
//! drives it and applies the results to the sprites.

use bytemuck::Zeroable;
use midway_shared::CoordsXYZ;

use crate::entity::{EntityId, EntityKind};

/// Pre/post tick snapshots of every tweened entity.
#[derive(Clone, Debug, Default)]
pub struct PositionTweener {
    /// Tracked ids; [`EntityId::NULL`] marks an entity destroyed mid-interval.
    entities: Vec<EntityId>,
    pre: Vec<CoordsXYZ>,
    post: Vec<CoordsXYZ>,
}

impl PositionTweener {
    /// Creates an empty tweener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every snapshot.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pre.clear();
        self.post.clear();
    }

    /// Number of tracked positions, holes included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if nothing is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Tracked id at `index`, `None` for a hole or an out of range index.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, index: usize) -> Option<EntityId> {
        self.entities.get(index).copied().filter(|id| !id.is_null())
    }

    /// Returns true if `id` is tracked and not a hole.
    #[must_use]
    pub fn is_tracking(&self, id: EntityId) -> bool {
        !id.is_null() && self.entities.contains(&id)
    }

    /// Pre-tick snapshot at `index`.
    #[inline]
    #[must_use]
    pub fn pre_position(&self, index: usize) -> Option<CoordsXYZ> {
        self.pre.get(index).copied()
    }

    /// Post-tick snapshot at `index`.
    #[inline]
    #[must_use]
    pub fn post_position(&self, index: usize) -> Option<CoordsXYZ> {
        self.post.get(index).copied()
    }

    /// Returns true once the post-tick snapshot lines up with the tracked ids.
    #[inline]
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.post.len() == self.entities.len()
    }

    /// Starts tracking `id` with its pre-tick position.
    pub fn track(&mut self, id: EntityId, pre: CoordsXYZ) {
        self.entities.push(id);
        self.pre.push(pre);
    }

    /// Records the post-tick snapshot. `position_of` is asked for every
    /// tracked id that is not a hole; holes get a zeroed placeholder.
    pub fn record_post(&mut self, mut position_of: impl FnMut(EntityId) -> CoordsXYZ) {
        self.post.clear();
        self.post.reserve(self.entities.len());
        for id in &self.entities {
            let pos = if id.is_null() {
                CoordsXYZ::zeroed()
            } else {
                position_of(*id)
            };
            self.post.push(pos);
        }
    }

    /// Stops tweening a destroyed entity, leaving a hole so indices stay put.
    ///
    /// Untracked kinds are ignored.
    pub fn remove_entity(&mut self, id: EntityId, kind: EntityKind) {
        if !kind.is_tweened() || id.is_null() {
            return;
        }
        if let Some(slot) = self.entities.iter_mut().find(|e| **e == id) {
            *slot = EntityId::NULL;
        }
    }

    /// Where the entity at `index` should be drawn for blend factor `alpha`.
    ///
    /// `None` for holes, unmoved entities and while the post snapshot is
    /// missing. An entity placed or unplaced during the tick still blends
    /// between its two snapshots, so the endpoints reproduce them exactly.
    #[must_use]
    pub fn target(&self, index: usize, alpha: f32) -> Option<(EntityId, CoordsXYZ)> {
        if !self.is_aligned() {
            return None;
        }
        let id = self.entity_at(index)?;
        let pre = self.pre[index];
        let post = self.post[index];
        if pre == post {
            return None;
        }
        Some((id, blend(pre, post, alpha)))
    }
}

/// Linear blend of two positions, rounded half away from zero per axis.
///
/// `alpha` outside `0.0..=1.0` extrapolates.
#[must_use]
pub fn blend(pre: CoordsXYZ, post: CoordsXYZ, alpha: f32) -> CoordsXYZ {
    CoordsXYZ::new(
        blend_axis(pre.x, post.x, alpha),
        blend_axis(pre.y, post.y, alpha),
        blend_axis(pre.z, post.z, alpha),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn blend_axis(pre: i32, post: i32, alpha: f32) -> i32 {
    // World coordinates fit in 17 bits, well inside f32's exact integer range.
    (post as f32 * alpha + pre as f32 * (1.0 - alpha)).round() as i32
}
