//! # Viewport Invalidation
//!
//! The renderer owns the viewports; the entity core only tells it which
//! screen rectangles went stale and how far zoomed out a viewport can be
//! before the change stops being visible.

use midway_shared::ScreenRect;

use crate::entity::{EntityKind, KIND_COUNT};

/// Receiver of "this screen region must be redrawn" notifications.
pub trait ScreenInvalidator {
    /// Marks `rect` dirty for every viewport at `max_zoom` or closer.
    fn invalidate_region(&mut self, rect: ScreenRect, max_zoom: u8);
}

/// Discards every notification. Used by headless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInvalidation;

impl ScreenInvalidator for NoInvalidation {
    #[inline]
    fn invalidate_region(&mut self, _rect: ScreenRect, _max_zoom: u8) {}
}

/// Records every notification in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidationLog {
    /// Regions received, oldest first.
    pub regions: Vec<(ScreenRect, u8)>,
}

impl InvalidationLog {
    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

impl ScreenInvalidator for InvalidationLog {
    fn invalidate_region(&mut self, rect: ScreenRect, max_zoom: u8) {
        self.regions.push((rect, max_zoom));
    }
}

/// Per-kind maximum zoom level for invalidation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomTable {
    levels: [u8; KIND_COUNT],
}

impl ZoomTable {
    /// Sets the zoom level for one kind. Ignored for [`EntityKind::Null`].
    pub fn set(&mut self, kind: EntityKind, max_zoom: u8) {
        if let Some(index) = kind.table_index() {
            self.levels[index] = max_zoom;
        }
    }

    /// Zoom level for `kind`; 0 for [`EntityKind::Null`].
    #[inline]
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> u8 {
        kind.table_index().map_or(0, |index| self.levels[index])
    }
}

impl Default for ZoomTable {
    fn default() -> Self {
        let mut levels = [0; KIND_COUNT];
        for kind in EntityKind::ALL {
            levels[kind as usize] = kind.default_max_zoom();
        }
        Self { levels }
    }
}
