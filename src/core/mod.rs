// src/core/mod.rs

pub mod arena;
pub mod chain_random;
pub mod cpu_info;
pub mod error;
pub mod pointer_chain;

pub use arena::{Arena, SLOT_BYTES};
pub use chain_random::ChainRandom;
pub use error::ProbeError;
pub use pointer_chain::{chase, PointerChain};
