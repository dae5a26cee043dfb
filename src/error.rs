//! Error types for midi-batch-transposer

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransposeError {
    #[error("transposition must be between -12 and 12, got {0}")]
    ShiftOutOfRange(i32),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: midly::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid transpose range {min}..={max}: {reason}")]
    Range { min: i32, max: i32, reason: &'static str },
}

/// Operator asked to stop. Never recorded as a per-file or per-shift failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transposition interrupted")]
pub struct Interrupted;

pub type Result<T> = std::result::Result<T, TransposeError>;
