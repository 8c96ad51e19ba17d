//! Error types for interference
//!
//! Every variant is fatal to the current run. Fix the input data or the
//! arguments and re-run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Interference error types
#[derive(Error, Debug)]
pub enum Error {
    /// Expected leaf measurement file is absent
    #[error("Missing measurement file: {}", path.display())]
    MissingFile {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// Leaf table is unreadable or lacks the response-time column
    #[error("Malformed table {}: {reason}", path.display())]
    MalformedTable {
        /// Offending table
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Standard error is undefined below two pooled samples
    #[error("Insufficient samples for step {step}: got {count}, need at least 2")]
    InsufficientSamples {
        /// Step identifier
        step: String,
        /// Pooled sample count
        count: usize,
    },

    /// Non-positive duration, step count, repeat count or similar
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Benchmark root holds no (step, repeat) measurements at all
    #[error("No measurements found under {}", root.display())]
    NoMeasurements {
        /// Benchmark root directory
        root: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
