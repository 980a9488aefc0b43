// src/report/mod.rs

pub mod system_info;
pub mod results;

pub use system_info::SystemInfo;
pub use results::{AssociativitySample, CacheReport, LineSizeSample, ProbeRun, Progress, SEPARATOR};
