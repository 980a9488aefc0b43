// src/core/pointer_chain.rs

use std::hint::black_box;

use crate::core::arena::Arena;
use crate::core::chain_random::ChainRandom;

/// A single closed cycle of `len` nodes written into an [`Arena`].
///
/// Node `k` lives at slot `base + k * stride`. Each node slot stores the slot
/// index of its successor, so following the chain is a sequence of dependent
/// loads: the value read decides where the next read goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerChain {
    base: usize,
    stride: usize,
    len: usize,
}

impl PointerChain {
    /// Write a freshly shuffled cycle into the arena.
    ///
    /// Panics if the chain would not fit; sizing the arena is the caller's job.
    pub fn build(
        arena: &mut Arena,
        base: usize,
        stride: usize,
        len: usize,
        random: &mut ChainRandom,
    ) -> Self {
        assert!(len >= 1, "a chain needs at least one node");
        assert!(stride >= 1, "stride must be at least one slot");

        let chain = PointerChain { base, stride, len };
        assert!(
            chain.end_slot() <= arena.capacity(),
            "chain of {} nodes at stride {} from slot {} needs {} slots, arena has {}",
            len,
            stride,
            base,
            chain.end_slot(),
            arena.capacity()
        );

        let order = random.permutation(len);
        let slots = arena.slots_mut();
        for i in 0..len {
            let prev = order[i];
            let next = order[(i + 1) % len];
            slots[chain.node(prev)] = chain.node(next);
        }
        chain
    }

    /// Slot of node 0. Always on the cycle, so traversal can start here.
    pub fn start(&self) -> usize {
        self.base
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn node(&self, k: usize) -> usize {
        self.base + k * self.stride
    }

    /// One past the highest slot this chain touches.
    pub fn end_slot(&self) -> usize {
        self.node(self.len - 1) + 1
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot >= self.base && (slot - self.base) % self.stride == 0 && (slot - self.base) / self.stride < self.len
    }
}

/// Follow `steps` links starting at `start` and return where the walk ends.
///
/// Kept out of line and fenced with `black_box` on both ends so the optimizer
/// sees neither the slot contents nor a dead result.
#[inline(never)]
pub fn chase(slots: &[usize], start: usize, steps: usize) -> usize {
    let slots = black_box(slots);
    let mut idx = start;
    for _ in 0..steps {
        idx = slots[idx];
    }
    black_box(idx)
}
