//! # Memory Management
//!
//! Slot bookkeeping for the fixed entity table.
//!
//! All memory is allocated once when the world is built. Creating and
//! destroying entities afterwards never touches the heap.

mod slots;

pub use slots::{SlotAllocator, SlotClass};
