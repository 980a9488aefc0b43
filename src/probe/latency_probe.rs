// src/probe/latency_probe.rs
//
// Pointer-chasing latency measurements.
//
// Both measurements build randomized single-cycle chains inside the arena and
// time a long run of dependent loads over them. Every load's address is the
// value returned by the previous load, so the timed loop exposes memory
// latency rather than throughput.

use std::time::Instant;

use log::trace;

use crate::config::ProbeSettings;
use crate::core::arena::{Arena, SLOT_BYTES};
use crate::core::chain_random::ChainRandom;
use crate::core::pointer_chain::{chase, PointerChain};

/// Where the estimators get their timings from.
///
/// The hardware implementation is [`HardwareProbe`]; tests substitute
/// deterministic latency models.
pub trait LatencySource {
    /// Seconds to chase a chain of `assoc` nodes spaced `way_size` bytes apart.
    fn associativity_latency(&mut self, assoc: usize, way_size: usize) -> f64;

    /// Seconds to alternate two `assoc`-node chains whose second chain is
    /// shifted by `line_size` bytes inside each way.
    fn line_size_latency(&mut self, line_size: usize, way_size: usize, assoc: usize) -> f64;
}

/// Time `iterations` dependent loads over a fresh chain of `assoc` nodes.
///
/// Averages over `outer_repeats` timed phases; each phase is preceded by one
/// untimed cycle to warm the cache.
pub fn measure(
    arena: &mut Arena,
    assoc: usize,
    way_size: usize,
    iterations: usize,
    outer_repeats: usize,
) -> f64 {
    assert!(assoc >= 1, "association count must be positive");
    assert!(
        way_size > 0 && way_size % SLOT_BYTES == 0,
        "way size {} is not a positive multiple of {}",
        way_size,
        SLOT_BYTES
    );
    assert!(outer_repeats >= 1);

    let stride = way_size / SLOT_BYTES;
    let mut random = ChainRandom::new();
    let chain = PointerChain::build(arena, 0, stride, assoc, &mut random);
    let slots = arena.slots();

    let mut elapsed_sum = 0.0;
    let mut idx = chain.start();
    for _ in 0..outer_repeats {
        idx = chase(slots, idx, assoc);

        let start = Instant::now();
        idx = chase(slots, idx, iterations);
        elapsed_sum += start.elapsed().as_secs_f64();
    }
    trace!("measure(assoc={}, way_size={}) ended at slot {}", assoc, way_size, idx);

    elapsed_sum / outer_repeats as f64
}

/// Time `iterations` rounds of one full cycle over each of two disjoint chains.
///
/// The first chain starts at slot 0. The second sits `line_size` bytes into
/// the way block right after the first chain's `assoc` ways.
pub fn measure_line(
    arena: &mut Arena,
    line_size: usize,
    way_size: usize,
    assoc: usize,
    iterations: usize,
) -> f64 {
    assert!(assoc >= 1, "association count must be positive");
    assert!(
        way_size > 0 && way_size % SLOT_BYTES == 0,
        "way size {} is not a positive multiple of {}",
        way_size,
        SLOT_BYTES
    );

    let stride = way_size / SLOT_BYTES;
    let shift = line_size / SLOT_BYTES;
    let first = PointerChain::build(arena, 0, stride, assoc, &mut ChainRandom::new());
    let second = PointerChain::build(arena, shift + assoc * stride, stride, assoc, &mut ChainRandom::new());
    let slots = arena.slots();

    let mut idx1 = chase(slots, first.start(), assoc);
    let mut idx2 = chase(slots, second.start(), assoc);

    let start = Instant::now();
    for _ in 0..iterations {
        idx1 = chase(slots, idx1, assoc);
        idx2 = chase(slots, idx2, assoc);
    }
    let elapsed = start.elapsed().as_secs_f64();
    trace!("measure_line(line_size={}) ended at slots {} / {}", line_size, idx1, idx2);

    elapsed
}

/// Measures real memory latency over a borrowed arena.
pub struct HardwareProbe<'a> {
    arena: &'a mut Arena,
    settings: ProbeSettings,
}

impl<'a> HardwareProbe<'a> {
    pub fn new(arena: &'a mut Arena, settings: &ProbeSettings) -> Self {
        HardwareProbe {
            arena,
            settings: settings.clone(),
        }
    }
}

impl LatencySource for HardwareProbe<'_> {
    fn associativity_latency(&mut self, assoc: usize, way_size: usize) -> f64 {
        measure(
            self.arena,
            assoc,
            way_size,
            self.settings.iterations,
            self.settings.outer_repeats,
        )
    }

    fn line_size_latency(&mut self, line_size: usize, way_size: usize, assoc: usize) -> f64 {
        measure_line(self.arena, line_size, way_size, assoc, self.settings.line_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_finite_time() {
        let mut arena = Arena::new(1 << 14);
        let elapsed = measure(&mut arena, 8, 4096, 10_000, 2);
        assert!(elapsed.is_finite());
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn test_measure_line_returns_finite_time() {
        let mut arena = Arena::new(1 << 14);
        let elapsed = measure_line(&mut arena, 64, 4096, 4, 1_000);
        assert!(elapsed.is_finite());
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn test_hardware_probe_uses_settings() {
        let mut arena = Arena::new(1 << 14);
        let settings = ProbeSettings {
            arena_slots: 1 << 14,
            iterations: 1_000,
            outer_repeats: 1,
            line_iterations: 100,
        };
        let mut probe = HardwareProbe::new(&mut arena, &settings);
        assert!(probe.associativity_latency(4, 1024) >= 0.0);
        assert!(probe.line_size_latency(8, 1024, 4) >= 0.0);
    }

    #[test]
    #[should_panic]
    fn test_unaligned_way_size_panics() {
        let mut arena = Arena::new(1 << 10);
        measure(&mut arena, 2, SLOT_BYTES + 1, 10, 1);
    }
}
