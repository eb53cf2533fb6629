//! Error taxonomy for loading and emitting oracle reports
//!
//! Every variant is contained at the pool boundary by the generators: the pool is
//! logged and skipped, the batch keeps going.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    /// A required series file for a pool does not exist
    #[error("input file {} does not exist", .0.display())]
    MissingInputFile(PathBuf),

    /// JSON parse failure or unexpected shape
    #[error("malformed input in {}: {source}", .path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Unix timestamp that cannot be represented as an instant
    #[error("timestamp {timestamp} in {} is out of range", .path.display())]
    InvalidTimestamp { path: PathBuf, timestamp: i64 },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BenchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Missing files are expected in a partial data layout and only warrant a warning
    pub fn is_missing_input(&self) -> bool {
        matches!(self, BenchError::MissingInputFile(_))
    }
}

pub type BenchResult<T> = std::result::Result<T, BenchError>;
