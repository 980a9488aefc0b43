// src/config/probe_config.rs

use serde::{Deserialize, Serialize};
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use std::path::Path;

use crate::core::arena::{DEFAULT_ARENA_SLOTS, SLOT_BYTES};
use crate::core::error::ProbeError;

/// Main configuration structure. Defaults reproduce the reference sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Timing loop and arena sizing
    pub probe: ProbeSettings,

    /// Associativity / way-size sweep
    pub associativity: AssociativitySettings,

    /// Line-size sweep
    pub line_size: LineSizeSettings,

    /// Result reporting
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Pointer-sized slots in the scratch arena (default: 2^25)
    pub arena_slots: usize,

    /// Dependent loads timed per associativity probe (default: 10M)
    pub iterations: usize,

    /// Timed phases averaged per associativity probe (default: 1)
    pub outer_repeats: usize,

    /// Interleaved two-chain rounds timed per line-size candidate (default: 10M)
    pub line_iterations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociativitySettings {
    /// Association counts probed are the even numbers in 2..2*max_assoc
    pub max_assoc: usize,

    /// First way size tried is 2^max_way_size_log; also the number of halvings
    pub max_way_size_log: u32,

    /// Latency ratio that counts as a cliff
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSizeSettings {
    /// Candidates are 2^1 .. 2^(max_line_size_log - 1) bytes
    pub max_line_size_log: u32,

    /// Latency ratio that counts as a cliff
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Write a JSON run record here when set
    #[serde(default)]
    pub json_path: Option<String>,

    /// Log the CPU-reported L1 values next to the measured ones
    pub compare_reported: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            log_level: "info".to_string(),
            probe: ProbeSettings::default(),
            associativity: AssociativitySettings::default(),
            line_size: LineSizeSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            arena_slots: DEFAULT_ARENA_SLOTS,
            iterations: 10_000_000,
            outer_repeats: 1,
            line_iterations: 10_000_000,
        }
    }
}

impl Default for AssociativitySettings {
    fn default() -> Self {
        AssociativitySettings {
            max_assoc: 50,
            max_way_size_log: 14,
            threshold: 1.3,
        }
    }
}

impl Default for LineSizeSettings {
    fn default() -> Self {
        LineSizeSettings {
            max_line_size_log: 12,
            threshold: 1.3,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            json_path: None,
            compare_reported: true,
        }
    }
}

impl ProbeConfig {
    /// Load configuration with precedence: config file → env vars → defaults
    pub fn load() -> Result<Self, ProbeError> {
        let mut builder = Self::defaults_builder()?;

        // Try to load from config files (TOML preferred, YAML fallback)
        if Path::new("l1probe.toml").exists() {
            builder = builder.add_source(File::with_name("l1probe.toml"));
        } else if Path::new("l1probe.yaml").exists() {
            builder = builder.add_source(File::with_name("l1probe.yaml"));
        }

        Self::finish(builder)
    }

    /// Load configuration with custom file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProbeError> {
        let mut builder = Self::defaults_builder()?;

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        Self::finish(builder)
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = ProbeConfig::default();
        Config::builder()
            .set_default("log_level", defaults.log_level)?
            .set_default("probe.arena_slots", defaults.probe.arena_slots as i64)?
            .set_default("probe.iterations", defaults.probe.iterations as i64)?
            .set_default("probe.outer_repeats", defaults.probe.outer_repeats as i64)?
            .set_default("probe.line_iterations", defaults.probe.line_iterations as i64)?
            .set_default("associativity.max_assoc", defaults.associativity.max_assoc as i64)?
            .set_default("associativity.max_way_size_log", defaults.associativity.max_way_size_log as i64)?
            .set_default("associativity.threshold", defaults.associativity.threshold)?
            .set_default("line_size.max_line_size_log", defaults.line_size.max_line_size_log as i64)?
            .set_default("line_size.threshold", defaults.line_size.threshold)?
            .set_default("report.compare_reported", defaults.report.compare_reported)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ProbeError> {
        // Override with environment variables, e.g. L1PROBE_PROBE__ITERATIONS
        let builder = builder.add_source(
            Environment::with_prefix("L1PROBE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
        );

        let config: ProbeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Largest first-way-size candidate, in bytes.
    pub fn max_way_size(&self) -> usize {
        1usize << self.associativity.max_way_size_log
    }

    /// Slots the arena must hold for the largest chain either sweep can build.
    pub fn required_arena_slots(&self) -> usize {
        let max_way_stride = self.max_way_size() / SLOT_BYTES;
        let longest_chain = (2 * self.associativity.max_assoc).saturating_sub(2);
        let assoc_sweep = longest_chain.saturating_sub(1) * max_way_stride + 1;

        // Detected cache size is at most (max_assoc - 2) ways of max_way_size,
        // and the second line-size chain sits past the first one plus a shift.
        let max_shift = (1usize << self.line_size.max_line_size_log.saturating_sub(1)) / SLOT_BYTES;
        let line_sweep = 2 * self.associativity.max_assoc.saturating_sub(2) * max_way_stride + max_shift + 1;

        assoc_sweep.max(line_sweep)
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        let invalid = |msg: String| Err(ProbeError::InvalidConfig(msg));

        if self.probe.iterations == 0 || self.probe.line_iterations == 0 || self.probe.outer_repeats == 0 {
            return invalid("iteration counts must be positive".to_string());
        }
        // the cliff scan starts at i = 4 and runs below max_assoc
        if self.associativity.max_assoc < 5 {
            return invalid(format!("associativity.max_assoc must be at least 5, got {}", self.associativity.max_assoc));
        }
        let way_log_min = SLOT_BYTES.trailing_zeros();
        if self.associativity.max_way_size_log < way_log_min || self.associativity.max_way_size_log > 30 {
            return invalid(format!(
                "associativity.max_way_size_log must be in {}..=30, got {}",
                way_log_min, self.associativity.max_way_size_log
            ));
        }
        if self.line_size.max_line_size_log < 3 || self.line_size.max_line_size_log > 20 {
            return invalid(format!("line_size.max_line_size_log must be in 3..=20, got {}", self.line_size.max_line_size_log));
        }
        if !(self.associativity.threshold > 1.0) || !(self.line_size.threshold > 1.0) {
            return invalid("thresholds must be greater than 1.0".to_string());
        }
        let required = self.required_arena_slots();
        if self.probe.arena_slots < required {
            return invalid(format!(
                "probe.arena_slots = {} is too small, the sweeps need {}",
                self.probe.arena_slots, required
            ));
        }
        Ok(())
    }
}
