//! Error types for the graph-search CLI.
//!
//! Everything the driver can fail on: reading relation files, parsing their
//! cells, loading configuration, and whatever the table function reports
//! when the relation is bound to it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding or running a table function failed
    #[error(transparent)]
    Function(#[from] graph_search::Error),

    /// File system operation failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON Lines reading or writing failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file
    #[error("configuration error: {0}")]
    Config(String),

    /// Relation file with an extension we cannot read
    #[error("unsupported relation file '{}': expected .csv or .jsonl", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A cell that is neither an integer nor a NULL token
    #[error("{}:{line}: column '{column}' has non-integer value '{value}'", .path.display())]
    InvalidCell {
        /// File being read
        path: PathBuf,
        /// One-based line number
        line: u64,
        /// Column name
        column: String,
        /// The offending text
        value: String,
    },
}
