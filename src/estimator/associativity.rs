// src/estimator/associativity.rs
//
// Associativity and way-size search.
//
// A chain of `n` nodes spaced exactly one way apart lands in a single cache
// set, so its latency jumps once `n` exceeds the associativity. When the
// spacing is halved the nodes spread over two sets and the jump moves to
// twice the association count. A boundary is only accepted when both views
// agree: a cliff at `i` for way size `2W` and a cliff at `2i - 2` for `W`.

use std::io::Write;

use log::{debug, info};

use crate::config::AssociativitySettings;
use crate::core::arena::SLOT_BYTES;
use crate::core::error::ProbeError;
use crate::probe::LatencySource;
use crate::report::{AssociativitySample, Progress};

/// Elapsed times for one way size, indexed by association count.
///
/// Only even counts are measured; odd slots stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    way_size: usize,
    elapsed: Vec<Option<f64>>,
}

impl SampleRow {
    pub fn new(way_size: usize, max_assoc: usize) -> Self {
        SampleRow {
            way_size,
            elapsed: vec![None; 2 * max_assoc],
        }
    }

    pub fn get(&self, assoc: usize) -> Option<f64> {
        self.elapsed.get(assoc).copied().flatten()
    }

    pub fn set(&mut self, assoc: usize, elapsed: f64) {
        self.elapsed[assoc] = Some(elapsed);
    }

    /// `elapsed[hi] / elapsed[lo]`, if both were measured.
    fn ratio(&self, hi: usize, lo: usize) -> Option<f64> {
        Some(self.get(hi)? / self.get(lo)?)
    }
}

pub struct AssociativityEstimator {
    settings: AssociativitySettings,
}

impl AssociativityEstimator {
    pub fn new(settings: &AssociativitySettings) -> Self {
        AssociativityEstimator {
            settings: settings.clone(),
        }
    }

    /// Sweep way sizes from the largest candidate down, returning
    /// `(associativity, way_size)` at the first cross-validated cliff.
    ///
    /// Way sizes below one slot cannot hold a chain and end the sweep early.
    pub fn find<S: LatencySource, W: Write>(
        &self,
        source: &mut S,
        progress: &mut Progress<W>,
    ) -> Result<(usize, usize), ProbeError> {
        let mut way_size = 1usize << self.settings.max_way_size_log;
        let mut smallest_tried = way_size;
        let mut previous: Option<SampleRow> = None;

        for _ in 0..self.settings.max_way_size_log {
            if way_size < SLOT_BYTES {
                break;
            }
            debug!("Sweeping association counts at way size {}", way_size);

            let current = self.measure_row(source, way_size, progress)?;
            smallest_tried = way_size;

            if let Some(prev) = &previous {
                if let Some((assoc, found_way_size)) = self.detect(prev, &current) {
                    info!(
                        "Associativity cliff: assoc = {}, way size = {} (confirmed at way size {})",
                        assoc, found_way_size, way_size
                    );
                    return Ok((assoc, found_way_size));
                }
            }

            previous = Some(current);
            way_size >>= 1;
        }

        Err(ProbeError::AssociativityNotFound {
            smallest_way_size: smallest_tried,
            max_assoc: self.settings.max_assoc,
        })
    }

    /// Measure every even association count in `2..2*max_assoc` at one way size.
    pub fn measure_row<S: LatencySource, W: Write>(
        &self,
        source: &mut S,
        way_size: usize,
        progress: &mut Progress<W>,
    ) -> Result<SampleRow, ProbeError> {
        let mut row = SampleRow::new(way_size, self.settings.max_assoc);
        for assoc in (2..2 * self.settings.max_assoc).step_by(2) {
            let elapsed = source.associativity_latency(assoc, way_size);
            row.set(assoc, elapsed);
            progress.record_assoc(AssociativitySample { assoc, way_size, elapsed })?;
        }
        Ok(row)
    }

    /// Look for `i` where the previous (twice as wide) row jumps between
    /// `i - 2` and `i`, and the current row jumps between `2i - 4` and `2i - 2`.
    pub fn detect(&self, previous: &SampleRow, current: &SampleRow) -> Option<(usize, usize)> {
        let threshold = self.settings.threshold;
        for i in 4..self.settings.max_assoc {
            let (Some(k1), Some(k2)) = (previous.ratio(i, i - 2), current.ratio(2 * i - 2, 2 * i - 4)) else {
                continue;
            };
            if k1 > threshold && k2 > threshold {
                return Some((i - 2, current.way_size * 2));
            }
        }
        None
    }
}
