// src/report/system_info.rs

use serde::{Deserialize, Serialize};
use sysinfo::{CpuRefreshKind, RefreshKind, System};

/// The CPU a run was measured on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub arch: String,
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub cpu_threads: usize,
    pub cpu_frequency_mhz: u64,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new().with_frequency()),
        );
        let first_cpu = sys.cpus().first();

        SystemInfo {
            arch: std::env::consts::ARCH.to_string(),
            cpu_model: first_cpu
                .map(|cpu| cpu.brand().trim())
                .filter(|brand| !brand.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.physical_core_count().unwrap_or(0),
            cpu_threads: sys.cpus().len(),
            cpu_frequency_mhz: first_cpu.map_or(0, |cpu| cpu.frequency()),
        }
    }

    pub fn to_string_pretty(&self) -> String {
        format!(
            "CPU: {} [{}], {} cores / {} threads @ {} MHz",
            self.cpu_model, self.arch, self.cpu_cores, self.cpu_threads, self.cpu_frequency_mhz
        )
    }
}
