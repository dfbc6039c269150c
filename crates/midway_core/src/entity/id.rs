//! # Entity Identifiers
//!
//! An entity id is the index of its slot in the entity table. It never
//! changes while the entity is alive, and ids are reused in ascending order
//! once freed.

use std::fmt;

/// Identifier of an entity slot.
///
/// Ids are plain 16-bit slot indices. There is no generation counter: a
/// freed id is handed out again deterministically (smallest first), which
/// is what keeps networked peers in lockstep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u16);

impl EntityId {
    /// Null/invalid entity ID. Never a valid slot, whatever the capacity.
    pub const NULL: Self = Self(u16::MAX);

    /// Creates an id from a raw slot index.
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Creates an id from a `usize` slot index, if it fits.
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index)
            .ok()
            .filter(|raw| *raw != u16::MAX)
            .map(Self)
    }

    /// Returns the raw 16-bit value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u16::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new(1234);
        assert_eq!(id.get(), 1234);
        assert_eq!(id.index(), 1234);
        assert!(!id.is_null());
    }

    #[test]
    fn test_from_index_rejects_null_and_overflow() {
        assert_eq!(EntityId::from_index(7), Some(EntityId::new(7)));
        assert_eq!(EntityId::from_index(usize::from(u16::MAX)), None);
        assert_eq!(EntityId::from_index(70_000), None);
    }

    #[test]
    fn test_ids_order_by_slot() {
        assert!(EntityId::new(3) < EntityId::new(10));
        assert_eq!(EntityId::default(), EntityId::NULL);
        assert_eq!(EntityId::NULL.to_string(), "null");
        assert_eq!(EntityId::new(5).to_string(), "#5");
    }
}
