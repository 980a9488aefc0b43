// src/core/error.rs

use std::fmt;

#[derive(Debug)]
pub enum ProbeError {
    /// The way-size sweep ran out of candidates without a cross-validated cliff.
    AssociativityNotFound {
        smallest_way_size: usize,
        max_assoc: usize,
    },
    /// No consecutive pair of line-size candidates crossed the threshold.
    LineSizeNotFound {
        largest_candidate: usize,
    },
    InvalidConfig(String),
    Config(config::ConfigError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::AssociativityNotFound { smallest_way_size, max_assoc } => write!(
                f,
                "assoc not found (way sizes down to {} bytes, association counts below {})",
                smallest_way_size, max_assoc
            ),
            ProbeError::LineSizeNotFound { largest_candidate } => write!(
                f,
                "line size not found (candidates up to {} bytes)",
                largest_candidate
            ),
            ProbeError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            ProbeError::Config(e) => write!(f, "configuration error: {}", e),
            ProbeError::Io(e) => write!(f, "I/O error: {}", e),
            ProbeError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Config(e) => Some(e),
            ProbeError::Io(e) => Some(e),
            ProbeError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ProbeError {
    fn from(e: config::ConfigError) -> Self {
        ProbeError::Config(e)
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        ProbeError::Io(e)
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(e: serde_json::Error) -> Self {
        ProbeError::Json(e)
    }
}
