//! Error types for graph-search operations.
//!
//! The traversals themselves cannot fail: empty input, a NULL start and
//! malformed tree rows all produce a (possibly empty) result. Errors only
//! arise at the boundary, when a caller binds tables and scalars to a table
//! function or builds a [`Table`](crate::table::Table) that is not
//! rectangular.

use thiserror::Error;

/// Result type for graph-search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for binding and building relations.
#[derive(Debug, Error)]
pub enum Error {
    /// No function is registered under this name
    #[error("unknown table function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments for a function
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Function name
        function: String,
        /// Number of declared parameters
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// A table was passed where a scalar was expected, or the reverse
    #[error("{function}: argument {index} must be a {expected}")]
    ArgumentKind {
        /// Function name
        function: String,
        /// Zero-based argument position
        index: usize,
        /// The kind the parameter declares
        expected: &'static str,
    },

    /// An input table lacks a column the function reads
    #[error("{function}: input is missing column '{column}'")]
    MissingColumn {
        /// Function name
        function: String,
        /// The required column
        column: String,
    },

    /// A NULL in a column that must not contain NULLs
    #[error("{function}: column '{column}' is NULL at row {row}")]
    NullValue {
        /// Function name
        function: String,
        /// Column containing the NULL
        column: String,
        /// Zero-based row index
        row: usize,
    },

    /// Columns of differing lengths
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        /// The offending column
        column: String,
        /// Length of the first column
        expected: usize,
        /// Length of the offending column
        actual: usize,
    },

    /// Two columns with the same name
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A function name registered twice
    #[error("table function already registered: {0}")]
    DuplicateFunction(String),
}
