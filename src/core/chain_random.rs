// src/core/chain_random.rs

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Randomness used to order the nodes of a pointer chain.
///
/// `new()` draws a fresh seed from the thread RNG (itself seeded from the OS),
/// so no two probe calls share a permutation stream.
pub struct ChainRandom {
    rng: ChaCha8Rng,
}

impl ChainRandom {
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill(&mut seed);
        let mut rng = ChaCha8Rng::from_seed(seed);
        let counter = rng.random_range(100..200);
        for _ in 0..counter {
            rng.random::<u32>();
        }
        ChainRandom { rng }
    }

    /// Deterministic stream, for tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        ChainRandom {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniformly random ordering of `0..len`.
    pub fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

impl Default for ChainRandom {
    fn default() -> Self {
        Self::new()
    }
}
