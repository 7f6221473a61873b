//! Configuration for the graph-search CLI.
//!
//! Settings live in an optional YAML file. Without `--config`, the CLI looks
//! for `graph-search.yaml` in the working directory and falls back to
//! defaults when it is absent. Every field has a default, so a file only
//! needs the keys it changes:
//!
//! ```yaml
//! output:
//!   format: csv
//!   null-token: "[NULL]"
//!   quote-all: false
//! input:
//!   null-tokens: ["[NULL]", "NULL", ""]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "graph-search.yaml";

/// Default text for NULL cells in CSV output
pub const DEFAULT_NULL_TOKEN: &str = "[NULL]";

/// How result relations are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header row plus one CSV record per row
    #[default]
    Csv,
    /// One JSON object per row
    Jsonl,
}

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Input settings
    pub input: InputConfig,
}

/// Output section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Result format
    pub format: OutputFormat,

    /// Text written for NULL cells in CSV output. Must not read as a number,
    /// so it is always quoted and never mistaken for a node id.
    pub null_token: String,

    /// Quote every CSV field, numbers included
    pub quote_all: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            null_token: DEFAULT_NULL_TOKEN.to_string(),
            quote_all: false,
        }
    }
}

/// Input section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct InputConfig {
    /// CSV cell texts read as NULL, compared after trimming
    pub null_tokens: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            null_tokens: vec![DEFAULT_NULL_TOKEN.to_string(), "NULL".to_string(), String::new()],
        }
    }
}

impl InputConfig {
    /// Returns `true` if `cell` reads as NULL.
    #[must_use]
    pub fn is_null(&self, cell: &str) -> bool {
        self.null_tokens.iter().any(|token| token == cell)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config
            .validate()
            .map_err(|reason| Error::Config(format!("{}: {reason}", path.display())))?;
        Ok(config)
    }

    /// Check settings that parse but cannot be honoured.
    ///
    /// # Errors
    ///
    /// Returns the reason when the CSV null token reads as a number.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let token = self.output.null_token.as_str();
        if token.parse::<f64>().is_ok() || token.parse::<i128>().is_ok() {
            return Err(format!(
                "output.null-token '{token}' reads as a number and would be indistinguishable from a node id"
            ));
        }
        Ok(())
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Otherwise `graph-search.yaml` in `dir` is
    /// used when present, and defaults when not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading configuration");
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading configuration");
            Self::load(&candidate)
        } else {
            debug!("no configuration file, using defaults");
            Ok(Self::default())
        }
    }
}
