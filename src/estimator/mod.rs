// src/estimator/mod.rs

pub mod associativity;
pub mod line_size;

pub use associativity::{AssociativityEstimator, SampleRow};
pub use line_size::LineSizeEstimator;
