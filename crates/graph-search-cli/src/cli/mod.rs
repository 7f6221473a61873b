//! CLI command implementations.
//!
//! Each command reads its relation files, binds them to a table function
//! through the registry and writes the result relation to stdout.

use std::io::{self, Write};
use std::path::Path;

use graph_search::{Argument, FunctionRegistry, Table};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::io::{read_table, write_table};

pub mod dfs;
pub mod functions;
pub mod next_sibling;

/// Shared state for one CLI run.
pub struct Session {
    config: Config,
    registry: FunctionRegistry,
}

impl Session {
    /// Create a session with the built-in functions registered.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: FunctionRegistry::with_builtins(),
        }
    }

    /// The function registry.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Read the relation file passed as table parameter `index` of
    /// `function`, using the configured input settings.
    pub fn read(&self, path: &Path, function: &str, index: usize) -> Result<Table> {
        let signature = self
            .registry
            .get(function)
            .ok_or_else(|| graph_search::Error::UnknownFunction(function.to_string()))?
            .signature();
        read_table(
            path,
            &self.config.input,
            signature.table_columns(index).unwrap_or_default(),
        )
    }

    /// Invoke a function by name and write its result to `out`.
    pub fn call<W: Write>(&self, name: &str, args: &[Argument<'_>], out: W) -> Result<()> {
        let result = self.registry.invoke(name, args)?;
        info!(function = name, rows = result.row_count(), "writing result");
        write_table(&result, out, &self.config.output)
    }

    /// Invoke a function by name and write its result to stdout.
    pub fn call_to_stdout(&self, name: &str, args: &[Argument<'_>]) -> Result<()> {
        let stdout = io::stdout();
        self.call(name, args, stdout.lock())
    }
}
