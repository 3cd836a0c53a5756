//! Crate error type.

use std::path::PathBuf;

/// Errors produced by the analysis pipeline.
///
/// The numeric helpers in [`crate::correlation`] and [`crate::regression`]
/// return `Option` for undefined results; everything that represents a
/// caller mistake or an ingestion failure surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown column '{name}' (available: {})", available.join(", "))]
    UnknownColumn { name: String, available: Vec<String> },

    #[error("column '{column}' is not numeric: row {row} has value '{value}'")]
    NonNumericColumn {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{0}' is the date column and cannot be used as an axis")]
    DateColumnSelected(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("insufficient data: need at least {needed} rows, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
