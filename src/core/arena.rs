// src/core/arena.rs

use std::mem::size_of;

/// Size in bytes of one arena slot. Chains are laid out in units of this.
pub const SLOT_BYTES: usize = size_of::<usize>();

/// Slot count used by the reference sizing (2^25 pointer-sized slots).
pub const DEFAULT_ARENA_SLOTS: usize = 1 << 25;

/// Flat scratch memory for pointer chains.
///
/// Every slot is pointer-sized and, once a chain has been written, holds the
/// index of the next node of that chain. The arena is created once and lent to
/// whichever probe is running; it keeps no bookkeeping of its own.
pub struct Arena {
    slots: Vec<usize>,
}

impl Arena {
    pub fn new(slot_count: usize) -> Self {
        assert!(slot_count > 0, "arena needs at least one slot");
        Arena {
            slots: vec![0; slot_count],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity_bytes(&self) -> usize {
        self.slots.len() * SLOT_BYTES
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [usize] {
        &mut self.slots
    }
}
