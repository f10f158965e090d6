use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the chunkstats crates.
#[derive(Error, Debug)]
pub enum ChunkStatsError {
    /// A construction parameter (chunk size, bin count) is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The source could not be opened, read or parsed.
    #[error("Source unavailable {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A column name is not present in the source header.
    #[error("Column '{0}' is not a valid column in the dataset")]
    UnknownColumn(String),

    /// A column exists but holds non-numeric values.
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// A filter matched no rows in the whole source.
    #[error("No data found for the specified values of '{0}'")]
    NoMatchingRows(String),

    /// Output could not be serialised as JSON.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChunkStatsError {
    /// Build a [`ChunkStatsError::SourceUnavailable`] from any displayable cause.
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the chunkstats crates.
pub type Result<T> = std::result::Result<T, ChunkStatsError>;
