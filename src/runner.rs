// src/runner.rs

use std::io::Write;

use log::{info, warn};

use crate::config::ProbeConfig;
use crate::core::cpu_info::{CPUInfo, ReportedL1};
use crate::core::error::ProbeError;
use crate::estimator::{AssociativityEstimator, LineSizeEstimator};
use crate::probe::LatencySource;
use crate::report::{CacheReport, ProbeRun, Progress};

/// Runs the associativity search, then the line-size search, then reports.
pub struct ProbeRunner {
    config: ProbeConfig,
}

impl ProbeRunner {
    pub fn new(config: ProbeConfig) -> Self {
        ProbeRunner { config }
    }

    /// Discover the L1 parameters and print the summary block.
    ///
    /// Nothing is printed after the progress lines if either search fails.
    pub fn run<S: LatencySource, W: Write>(
        &self,
        source: &mut S,
        progress: &mut Progress<W>,
    ) -> Result<CacheReport, ProbeError> {
        let (assoc, way_size) =
            AssociativityEstimator::new(&self.config.associativity).find(source, progress)?;
        let cache_size = assoc * way_size;
        info!("Estimated {} ways of {} bytes ({} bytes total)", assoc, way_size, cache_size);

        let line_size =
            LineSizeEstimator::new(&self.config.line_size).find(source, cache_size, assoc, progress)?;

        let report = CacheReport::new(assoc, way_size, line_size);
        report.write_summary(progress.writer())?;
        progress.writer().flush()?;
        Ok(report)
    }

    /// Cross-check against the CPU-reported values and write the JSON record,
    /// as configured.
    pub fn publish<W: Write>(&self, report: &CacheReport, progress: Progress<W>) -> Result<(), ProbeError> {
        let reported = CPUInfo::reported_l1();
        if self.config.report.compare_reported {
            log_comparison(report, &reported);
        }

        if let Some(path) = &self.config.report.json_path {
            let (_, assoc_samples, line_samples) = progress.into_parts();
            let run = ProbeRun::new(*report, reported, assoc_samples, line_samples);
            run.save_to_file(path)?;
            info!("Results saved to: {}", path);
        }
        Ok(())
    }
}

fn log_comparison(report: &CacheReport, reported: &ReportedL1) {
    match reported.matches(report.size, report.line_size) {
        None => info!("CPU does not report L1 data cache parameters; nothing to compare"),
        Some(true) => info!(
            "Measured values agree with CPU-reported L1 (size {:?}, line {:?})",
            reported.size, reported.line_size
        ),
        Some(false) => warn!(
            "Measured size {} / line {} differ from CPU-reported size {:?} / line {:?}",
            report.size, report.line_size, reported.size, reported.line_size
        ),
    }
}
