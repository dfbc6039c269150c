//! Per-kind membership lists.

use super::id::EntityId;
use super::kind::{EntityKind, KIND_COUNT};

/// For each live kind, the ids currently holding it, ascending.
///
/// Ascending id order is what every walk, every serialisation pass and the
/// checksum see, so it never depends on the order entities were created in.
#[derive(Clone, Debug, Default)]
pub struct KindLists {
    lists: [Vec<EntityId>; KIND_COUNT],
}

impl KindLists {
    /// Creates empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of `kind`, ascending. Empty for [`EntityKind::Null`].
    #[inline]
    #[must_use]
    pub fn ids(&self, kind: EntityKind) -> &[EntityId] {
        kind.table_index().map_or(&[][..], |index| self.lists[index].as_slice())
    }

    /// Number of entities of `kind`.
    #[inline]
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.ids(kind).len()
    }

    /// Returns true if `id` is listed under `kind`.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.ids(kind).binary_search(&id).is_ok()
    }

    /// Smallest id of `kind` strictly greater than `after`.
    ///
    /// `EntityId::NULL` as `after` means "from the start".
    #[must_use]
    pub fn next_after(&self, kind: EntityKind, after: EntityId) -> Option<EntityId> {
        let ids = self.ids(kind);
        if after.is_null() {
            return ids.first().copied();
        }
        let start = ids.partition_point(|id| *id <= after);
        ids.get(start).copied()
    }

    /// Adds `id` under `kind`. Returns false if it was already present.
    pub fn insert(&mut self, kind: EntityKind, id: EntityId) -> bool {
        let Some(index) = kind.table_index() else {
            return false;
        };
        let list = &mut self.lists[index];
        match list.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                list.insert(pos, id);
                true
            }
        }
    }

    /// Removes `id` from `kind`. Returns false if it was not present.
    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> bool {
        let Some(index) = kind.table_index() else {
            return false;
        };
        let list = &mut self.lists[index];
        match list.binary_search(&id) {
            Ok(pos) => {
                list.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Empties every list, keeping allocations.
    pub fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }

    /// Total entities across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_stay_sorted() {
        let mut lists = KindLists::new();
        for raw in [7, 2, 9, 4] {
            assert!(lists.insert(EntityKind::Guest, EntityId::new(raw)));
        }
        assert!(!lists.insert(EntityKind::Guest, EntityId::new(4)));
        let raw: Vec<u16> = lists.ids(EntityKind::Guest).iter().map(|id| id.get()).collect();
        assert_eq!(raw, vec![2, 4, 7, 9]);
        assert_eq!(lists.count(EntityKind::Staff), 0);
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut lists = KindLists::new();
        lists.insert(EntityKind::Litter, EntityId::new(1));
        lists.insert(EntityKind::Litter, EntityId::new(3));
        assert!(lists.contains(EntityKind::Litter, EntityId::new(3)));
        assert!(lists.remove(EntityKind::Litter, EntityId::new(3)));
        assert!(!lists.remove(EntityKind::Litter, EntityId::new(3)));
        assert!(!lists.contains(EntityKind::Litter, EntityId::new(3)));
        assert_eq!(lists.total(), 1);
    }

    #[test]
    fn test_next_after() {
        let mut lists = KindLists::new();
        for raw in [5, 10, 15] {
            lists.insert(EntityKind::Vehicle, EntityId::new(raw));
        }
        let kind = EntityKind::Vehicle;
        assert_eq!(lists.next_after(kind, EntityId::NULL), Some(EntityId::new(5)));
        assert_eq!(lists.next_after(kind, EntityId::new(5)), Some(EntityId::new(10)));
        assert_eq!(lists.next_after(kind, EntityId::new(11)), Some(EntityId::new(15)));
        assert_eq!(lists.next_after(kind, EntityId::new(15)), None);
    }

    #[test]
    fn test_null_kind_is_never_listed() {
        let mut lists = KindLists::new();
        assert!(!lists.insert(EntityKind::Null, EntityId::new(0)));
        assert!(lists.ids(EntityKind::Null).is_empty());
    }
}
