// src/estimator/line_size.rs

use std::io::Write;

use log::{debug, info};

use crate::config::LineSizeSettings;
use crate::core::error::ProbeError;
use crate::probe::LatencySource;
use crate::report::{LineSizeSample, Progress};

/// Finds the line size by shifting a second chain within each way.
///
/// While the shift is smaller than a line, both chains fall into the same
/// sets and together overflow them. Once the shift reaches a full line the
/// second chain moves to the neighbouring set and the combined latency drops.
pub struct LineSizeEstimator {
    settings: LineSizeSettings,
}

impl LineSizeEstimator {
    pub fn new(settings: &LineSizeSettings) -> Self {
        LineSizeEstimator {
            settings: settings.clone(),
        }
    }

    pub fn candidates(&self) -> impl Iterator<Item = usize> {
        (1..self.settings.max_line_size_log).map(|log| 1usize << log)
    }

    pub fn find<S: LatencySource, W: Write>(
        &self,
        source: &mut S,
        cache_size: usize,
        assoc: usize,
        progress: &mut Progress<W>,
    ) -> Result<usize, ProbeError> {
        assert!(assoc >= 1, "association count must be positive");
        let way_size = cache_size / assoc;
        debug!("Sweeping line sizes with {} ways of {} bytes", assoc, way_size);

        let mut samples = Vec::new();
        for line_size in self.candidates() {
            let elapsed = source.line_size_latency(line_size, way_size, assoc);
            let sample = LineSizeSample { line_size, elapsed };
            progress.record_line(sample)?;
            samples.push(sample);
        }

        match self.detect(&samples) {
            Some(line_size) => {
                info!("Line size cliff at {} bytes", line_size);
                Ok(line_size)
            }
            None => Err(ProbeError::LineSizeNotFound {
                largest_candidate: samples.last().map_or(0, |s| s.line_size),
            }),
        }
    }

    /// First candidate that is more than `threshold` times faster than the one before it.
    pub fn detect(&self, samples: &[LineSizeSample]) -> Option<usize> {
        samples
            .windows(2)
            .find(|pair| pair[0].elapsed / pair[1].elapsed > self.settings.threshold)
            .map(|pair| pair[1].line_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineModel {
        line_size: usize,
    }

    impl LatencySource for LineModel {
        fn associativity_latency(&mut self, _: usize, _: usize) -> f64 {
            unreachable!()
        }

        fn line_size_latency(&mut self, line_size: usize, _: usize, _: usize) -> f64 {
            if line_size < self.line_size { 2.0 } else { 1.0 }
        }
    }

    #[test]
    fn test_finds_true_line_size() {
        let estimator = LineSizeEstimator::new(&LineSizeSettings::default());
        for true_line in [16, 32, 64, 128, 256] {
            let mut progress = Progress::new(std::io::sink());
            let mut model = LineModel { line_size: true_line };
            let found = estimator.find(&mut model, 32768, 8, &mut progress).unwrap();
            assert_eq!(found, true_line);
            assert_eq!(progress.line_samples().len(), 11);
        }
    }

    #[test]
    fn test_candidates_are_powers_of_two() {
        let estimator = LineSizeEstimator::new(&LineSizeSettings::default());
        let candidates: Vec<usize> = estimator.candidates().collect();
        assert_eq!(candidates.first(), Some(&2));
        assert_eq!(candidates.last(), Some(&2048));
        assert_eq!(candidates.len(), 11);
    }

    #[test]
    fn test_no_cliff_is_an_error() {
        let estimator = LineSizeEstimator::new(&LineSizeSettings::default());
        let mut progress = Progress::new(std::io::sink());
        // a line no smaller than every candidate never shows a drop
        let mut model = LineModel { line_size: 2 };

        match estimator.find(&mut model, 32768, 8, &mut progress) {
            Err(ProbeError::LineSizeNotFound { largest_candidate }) => assert_eq!(largest_candidate, 2048),
            other => panic!("expected LineSizeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_rising_latency_is_ignored() {
        let estimator = LineSizeEstimator::new(&LineSizeSettings::default());
        let samples = [
            LineSizeSample { line_size: 2, elapsed: 1.0 },
            LineSizeSample { line_size: 4, elapsed: 2.0 },
            LineSizeSample { line_size: 8, elapsed: 2.1 },
        ];
        assert_eq!(estimator.detect(&samples), None);
    }
}
