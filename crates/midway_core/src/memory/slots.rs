//! # Slot Allocator
//!
//! Fixed-capacity allocator for entity slot ids.
//!
//! Free ids live in a two-level bitset: one bit per slot, plus one summary
//! bit per 64-slot word that still has a free bit. Finding the smallest free
//! id is two `trailing_zeros` calls after a scan of the summary, which is
//! capacity / 4096 words long. Nothing allocates after construction.

use crate::entity::EntityId;
use crate::error::{EntityError, EntityResult};

const WORD_BITS: usize = 64;

/// Which reservation policy an allocation is subject to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotClass {
    /// Guests, staff, vehicles and litter. Only limited by capacity.
    Gameplay,
    /// Transient effects. Capped, and never allowed to take the last slots.
    Misc,
}

/// Hands out and reclaims slot ids, smallest free id first.
///
/// # Reservation
///
/// With `m` misc slots in use and `f` slots free, a misc request fails when
/// `m > max_misc` or `max_misc - m >= f`. Gameplay requests only fail when
/// nothing is free. [`SlotAllocator::allocate_at`] replays a known id and
/// skips the reservation check.
#[derive(Clone, Debug)]
pub struct SlotAllocator {
    /// Bit set = slot free.
    words: Box<[u64]>,
    /// Bit set = corresponding word has at least one free slot.
    summary: Box<[u64]>,
    capacity: usize,
    free_count: usize,
    misc_in_use: usize,
    max_misc: usize,
}

impl SlotAllocator {
    /// Creates an allocator with every slot free.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of slots
    /// * `max_misc` - Misc reservation budget
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or leaves no room for the null id.
    #[must_use]
    pub fn new(capacity: usize, max_misc: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= usize::from(u16::MAX),
            "Capacity cannot exceed {}",
            u16::MAX
        );

        let word_count = capacity.div_ceil(WORD_BITS);
        let summary_count = word_count.div_ceil(WORD_BITS);
        let mut allocator = Self {
            words: vec![0; word_count].into_boxed_slice(),
            summary: vec![0; summary_count].into_boxed_slice(),
            capacity,
            free_count: 0,
            misc_in_use: 0,
            max_misc,
        };
        allocator.reset();
        allocator
    }

    /// Frees every slot.
    pub fn reset(&mut self) {
        self.words.fill(u64::MAX);
        let tail = self.capacity % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }

        self.summary.fill(u64::MAX);
        let tail = self.words.len() % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.summary.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }

        self.free_count = self.capacity;
        self.misc_in_use = 0;
    }

    /// Total number of slots.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free slots.
    #[inline]
    #[must_use]
    pub const fn free_count(&self) -> usize {
        self.free_count
    }

    /// Number of slots held by misc entities.
    #[inline]
    #[must_use]
    pub const fn misc_in_use(&self) -> usize {
        self.misc_in_use
    }

    /// Misc reservation budget.
    #[inline]
    #[must_use]
    pub const fn max_misc(&self) -> usize {
        self.max_misc
    }

    /// Returns true if the misc reservation would refuse a request right now.
    ///
    /// Refuses while the unspent misc budget covers every free slot. With
    /// the budget exactly spent one more misc entity is still admitted;
    /// beyond that everything misc is refused.
    #[must_use]
    pub fn misc_blocked(&self) -> bool {
        self.misc_in_use > self.max_misc || self.max_misc - self.misc_in_use >= self.free_count
    }

    /// Returns true if `id` names a free slot.
    #[inline]
    #[must_use]
    pub fn is_free(&self, id: EntityId) -> bool {
        let index = id.index();
        index < self.capacity && self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Takes the smallest free id.
    ///
    /// # Errors
    ///
    /// [`EntityError::Exhausted`] if nothing is free, or if `class` is
    /// [`SlotClass::Misc`] and the reservation refuses it.
    pub fn allocate(&mut self, class: SlotClass) -> EntityResult<EntityId> {
        if self.free_count == 0 || (class == SlotClass::Misc && self.misc_blocked()) {
            return Err(self.exhausted());
        }
        let index = self.lowest_free().ok_or_else(|| self.exhausted())?;
        let id = EntityId::from_index(index).ok_or_else(|| self.exhausted())?;
        self.take(index, class);
        Ok(id)
    }

    /// Takes a specific id.
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] if `id` is not a slot,
    /// [`EntityError::Conflict`] if it is already taken.
    pub fn allocate_at(&mut self, id: EntityId, class: SlotClass) -> EntityResult<()> {
        self.check_range(id)?;
        if !self.is_free(id) {
            return Err(EntityError::Conflict(id));
        }
        self.take(id.index(), class);
        Ok(())
    }

    /// Returns a taken id to the free set.
    ///
    /// # Errors
    ///
    /// [`EntityError::OutOfRange`] if `id` is not a slot,
    /// [`EntityError::AlreadyFree`] on a double release.
    pub fn release(&mut self, id: EntityId, class: SlotClass) -> EntityResult<()> {
        self.check_range(id)?;
        if self.is_free(id) {
            return Err(EntityError::AlreadyFree(id));
        }
        let index = id.index();
        let word = index / WORD_BITS;
        self.words[word] |= 1 << (index % WORD_BITS);
        self.summary[word / WORD_BITS] |= 1 << (word % WORD_BITS);
        self.free_count += 1;
        if class == SlotClass::Misc {
            self.misc_in_use = self.misc_in_use.saturating_sub(1);
        }
        Ok(())
    }

    /// Free ids, largest first.
    ///
    /// This is the order a stack-shaped free list would hold them in; the
    /// next allocation takes the last one yielded.
    pub fn free_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.capacity)
            .rev()
            .filter_map(EntityId::from_index)
            .filter(|id| self.is_free(*id))
    }

    fn check_range(&self, id: EntityId) -> EntityResult<()> {
        if id.is_null() || id.index() >= self.capacity {
            return Err(EntityError::OutOfRange {
                id,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    fn exhausted(&self) -> EntityError {
        EntityError::Exhausted {
            free: self.free_count,
            misc_in_use: self.misc_in_use,
        }
    }

    fn lowest_free(&self) -> Option<usize> {
        let (summary_index, bits) = self
            .summary
            .iter()
            .enumerate()
            .find(|(_, bits)| **bits != 0)?;
        let word = summary_index * WORD_BITS + bits.trailing_zeros() as usize;
        let bit = self.words[word].trailing_zeros() as usize;
        Some(word * WORD_BITS + bit)
    }

    fn take(&mut self, index: usize, class: SlotClass) {
        let word = index / WORD_BITS;
        self.words[word] &= !(1 << (index % WORD_BITS));
        if self.words[word] == 0 {
            self.summary[word / WORD_BITS] &= !(1 << (word % WORD_BITS));
        }
        self.free_count -= 1;
        if class == SlotClass::Misc {
            self.misc_in_use += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u16) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn test_allocates_ascending() {
        let mut slots = SlotAllocator::new(5, 0);
        let ids: Vec<_> = (0..5)
            .map(|_| slots.allocate(SlotClass::Gameplay).unwrap())
            .collect();
        assert_eq!(ids, (0..5).map(id).collect::<Vec<_>>());
        assert!(matches!(
            slots.allocate(SlotClass::Gameplay),
            Err(EntityError::Exhausted { free: 0, .. })
        ));
    }

    #[test]
    fn test_smallest_free_reused_first() {
        let mut slots = SlotAllocator::new(5, 0);
        for _ in 0..5 {
            slots.allocate(SlotClass::Gameplay).unwrap();
        }
        slots.release(id(3), SlotClass::Gameplay).unwrap();
        slots.release(id(1), SlotClass::Gameplay).unwrap();

        assert_eq!(slots.free_ids().collect::<Vec<_>>(), vec![id(3), id(1)]);
        assert_eq!(slots.allocate(SlotClass::Gameplay).unwrap(), id(1));
        assert_eq!(slots.allocate(SlotClass::Gameplay).unwrap(), id(3));
    }

    #[test]
    fn test_crosses_word_boundaries() {
        let mut slots = SlotAllocator::new(200, 0);
        for _ in 0..200 {
            slots.allocate(SlotClass::Gameplay).unwrap();
        }
        slots.release(id(130), SlotClass::Gameplay).unwrap();
        slots.release(id(64), SlotClass::Gameplay).unwrap();
        assert_eq!(slots.allocate(SlotClass::Gameplay).unwrap(), id(64));
        assert_eq!(slots.allocate(SlotClass::Gameplay).unwrap(), id(130));
        assert_eq!(slots.free_count(), 0);
    }

    #[test]
    fn test_allocate_at() {
        let mut slots = SlotAllocator::new(8, 0);
        slots.allocate_at(id(5), SlotClass::Gameplay).unwrap();
        assert_eq!(
            slots.allocate_at(id(5), SlotClass::Gameplay),
            Err(EntityError::Conflict(id(5)))
        );
        assert!(matches!(
            slots.allocate_at(id(8), SlotClass::Gameplay),
            Err(EntityError::OutOfRange { capacity: 8, .. })
        ));
        assert_eq!(slots.allocate(SlotClass::Gameplay).unwrap(), id(0));
        assert_eq!(slots.free_count(), 6);
    }

    #[test]
    fn test_double_release_is_an_error() {
        let mut slots = SlotAllocator::new(4, 0);
        let first = slots.allocate(SlotClass::Gameplay).unwrap();
        slots.release(first, SlotClass::Gameplay).unwrap();
        assert_eq!(
            slots.release(first, SlotClass::Gameplay),
            Err(EntityError::AlreadyFree(first))
        );
        assert!(slots.release(EntityId::NULL, SlotClass::Gameplay).is_err());
    }

    #[test]
    fn test_misc_reservation() {
        // 10 slots, 4 reserved against misc.
        let mut slots = SlotAllocator::new(10, 4);
        for _ in 0..5 {
            slots.allocate(SlotClass::Gameplay).unwrap();
        }
        // 5 free: 4 - 0 >= 5 is false, so misc is allowed.
        slots.allocate(SlotClass::Misc).unwrap();
        assert_eq!(slots.misc_in_use(), 1);
        // 4 free: 4 - 1 >= 4 is false.
        slots.allocate(SlotClass::Misc).unwrap();
        // 3 free: 4 - 2 >= 3 is false.
        slots.allocate(SlotClass::Misc).unwrap();
        // 2 free: 4 - 3 >= 2 is false.
        slots.allocate(SlotClass::Misc).unwrap();
        // 1 free: 4 - 4 >= 1 is false, so a spent budget admits one more.
        assert!(!slots.misc_blocked());
        slots.allocate(SlotClass::Misc).unwrap();
        assert_eq!(slots.misc_in_use(), 5);
        // over budget.
        assert!(slots.misc_blocked());
        slots.release(id(0), SlotClass::Gameplay).unwrap();
        assert!(slots.allocate(SlotClass::Misc).is_err());
        // gameplay still succeeds.
        slots.allocate(SlotClass::Gameplay).unwrap();
    }

    #[test]
    fn test_misc_refused_when_few_slots_remain() {
        let mut slots = SlotAllocator::new(10, 4);
        for _ in 0..7 {
            slots.allocate(SlotClass::Gameplay).unwrap();
        }
        assert_eq!(slots.free_count(), 3);
        assert!(matches!(
            slots.allocate(SlotClass::Misc),
            Err(EntityError::Exhausted { free: 3, misc_in_use: 0 })
        ));
        // replay ignores the reservation
        slots.allocate_at(id(9), SlotClass::Misc).unwrap();
        assert_eq!(slots.misc_in_use(), 1);
        slots.release(id(9), SlotClass::Misc).unwrap();
        assert_eq!(slots.misc_in_use(), 0);
    }

    #[test]
    fn test_misc_over_budget_when_plenty_free() {
        let mut slots = SlotAllocator::new(100, 3);
        for _ in 0..4 {
            slots.allocate(SlotClass::Misc).unwrap();
        }
        assert_eq!(slots.misc_in_use(), 4);
        assert!(matches!(
            slots.allocate(SlotClass::Misc),
            Err(EntityError::Exhausted { free: 96, misc_in_use: 4 })
        ));
        slots.release(id(3), SlotClass::Misc).unwrap();
        slots.allocate(SlotClass::Misc).unwrap();
    }

    #[test]
    fn test_reset() {
        let mut slots = SlotAllocator::new(70, 3);
        for _ in 0..70 {
            slots.allocate(SlotClass::Gameplay).unwrap();
        }
        slots.reset();
        assert_eq!(slots.free_count(), 70);
        assert_eq!(slots.free_ids().count(), 70);
        assert_eq!(slots.allocate(SlotClass::Gameplay).unwrap(), id(0));
    }
}
