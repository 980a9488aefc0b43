// src/report/results.rs

use std::io::Write;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::core::cpu_info::ReportedL1;
use crate::report::system_info::SystemInfo;

pub const SEPARATOR: &str = "==========================================";

/// One associativity probe: a chain of `assoc` nodes at `way_size` spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssociativitySample {
    pub assoc: usize,
    pub way_size: usize,
    pub elapsed: f64,
}

/// One line-size probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSizeSample {
    pub line_size: usize,
    pub elapsed: f64,
}

/// Writes the per-probe progress lines and keeps every sample for the report.
pub struct Progress<W: Write> {
    out: W,
    assoc_samples: Vec<AssociativitySample>,
    line_samples: Vec<LineSizeSample>,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W) -> Self {
        Progress {
            out,
            assoc_samples: Vec::new(),
            line_samples: Vec::new(),
        }
    }

    pub fn record_assoc(&mut self, sample: AssociativitySample) -> std::io::Result<()> {
        writeln!(
            self.out,
            "CURRENT ASSOC = {}; CURRENT WAY SIZE = {}; ELAPSED = {:.6};",
            sample.assoc, sample.way_size, sample.elapsed
        )?;
        self.assoc_samples.push(sample);
        Ok(())
    }

    pub fn record_line(&mut self, sample: LineSizeSample) -> std::io::Result<()> {
        writeln!(
            self.out,
            "CURRENT LINE SIZE = {}; ELAPSED = {:.6};",
            sample.line_size, sample.elapsed
        )?;
        self.line_samples.push(sample);
        Ok(())
    }

    pub fn assoc_samples(&self) -> &[AssociativitySample] {
        &self.assoc_samples
    }

    pub fn line_samples(&self) -> &[LineSizeSample] {
        &self.line_samples
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_parts(self) -> (W, Vec<AssociativitySample>, Vec<LineSizeSample>) {
        (self.out, self.assoc_samples, self.line_samples)
    }
}

/// Discovered L1 data cache parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheReport {
    pub assoc: usize,
    pub way_size: usize,
    pub size: usize,
    pub line_size: usize,
}

impl CacheReport {
    pub fn new(assoc: usize, way_size: usize, line_size: usize) -> Self {
        CacheReport {
            assoc,
            way_size,
            size: assoc * way_size,
            line_size,
        }
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "LEVEL1_DCACHE_ASSOC: {}", self.assoc)?;
        writeln!(out, "LEVEL1_DCACHE_SIZE: {}", self.size)?;
        writeln!(out, "LEVEL1_DCACHE_LINESIZE: {}", self.line_size)?;
        Ok(())
    }
}

/// Everything about one run, as written to the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRun {
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub result: CacheReport,
    pub reported: ReportedL1,
    pub associativity_samples: Vec<AssociativitySample>,
    pub line_size_samples: Vec<LineSizeSample>,
}

impl ProbeRun {
    pub fn new(
        result: CacheReport,
        reported: ReportedL1,
        associativity_samples: Vec<AssociativitySample>,
        line_size_samples: Vec<LineSizeSample>,
    ) -> Self {
        ProbeRun {
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            result,
            reported,
            associativity_samples,
            line_size_samples,
        }
    }

    pub fn save_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let run = serde_json::from_str(&json)?;
        Ok(run)
    }
}
