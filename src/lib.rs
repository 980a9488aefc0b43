// src/lib.rs

pub mod config;
pub mod core;
pub mod estimator;
pub mod probe;
pub mod report;
pub mod runner;
