// src/probe/mod.rs

pub mod latency_probe;

pub use latency_probe::{measure, measure_line, HardwareProbe, LatencySource};
