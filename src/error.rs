//! Error types for check-procs.
//!
//! Every error that reaches the check runner is turned into an UNKNOWN
//! verdict; none of them escape as a panic or a bare exit.

use std::path::PathBuf;
use thiserror::Error;

use crate::process::ListerKind;
use crate::threshold::Metric;

/// Failures while obtaining the process snapshot.
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} produced no usable process lines")]
    NoProcesses { program: String },
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid command pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Anything that prevents a check run from producing a count.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Could not read pid file {}", .path.display())]
    PidFile { path: PathBuf },

    #[error("Metric {metric} is not reported by the {kind} process listing")]
    UnsupportedMetric { metric: Metric, kind: ListerKind },

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
