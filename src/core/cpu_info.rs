// src/core/cpu_info.rs

use cache_size::{l1_cache_line_size, l1_cache_size};
use serde::{Deserialize, Serialize};

/// L1 data cache parameters as the CPU itself reports them.
///
/// Never an input to discovery; only used to cross-check measured results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedL1 {
    pub size: Option<usize>,
    pub line_size: Option<usize>,
}

pub struct CPUInfo;

impl CPUInfo {
    // Fetches the total size in bytes of the L1 data cache.
    pub fn l1_cache_size() -> Option<usize> {
        l1_cache_size()
    }

    // Fetches the line size in bytes of the L1 data cache.
    pub fn l1_cache_line_size() -> Option<usize> {
        l1_cache_line_size()
    }

    pub fn reported_l1() -> ReportedL1 {
        ReportedL1 {
            size: Self::l1_cache_size(),
            line_size: Self::l1_cache_line_size(),
        }
    }
}

impl ReportedL1 {
    /// `None` when the CPU reported nothing to compare against.
    pub fn matches(&self, size: usize, line_size: usize) -> Option<bool> {
        match (self.size, self.line_size) {
            (None, None) => None,
            (s, l) => Some(s.map_or(true, |s| s == size) && l.map_or(true, |l| l == line_size)),
        }
    }
}
