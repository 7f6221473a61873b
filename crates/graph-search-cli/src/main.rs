//! graph-search CLI - run graph table functions over relation files.
//!
//! Reads edge, roots or tree relations from CSV or JSON Lines files, runs
//! the matching table function and prints the result relation to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod io;

use config::{Config, OutputFormat};

/// graph-search: reachability DFS and next-sibling over relation files.
#[derive(Parser)]
#[command(name = "graph-search")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./graph-search.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overriding the configuration file
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Depth-first reachability: (node_id, parent_node_id) spanning forest
    Dfs {
        /// Edge relation with source_node_id and dest_node_id columns
        #[arg(short, long)]
        edges: PathBuf,

        /// Start node (omit for NULL, which yields no rows)
        #[arg(short, long, allow_hyphen_values = true, conflicts_with = "roots")]
        start: Option<i64>,

        /// Roots relation with a node_id column, walked in row order
        #[arg(short, long)]
        roots: Option<PathBuf>,
    },

    /// Next sibling of every node: (node_id, next_node_id)
    NextSibling {
        /// Tree relation with node_id, node_parent_id and sort_key columns
        #[arg(short, long)]
        tree: PathBuf,
    },

    /// List the available table functions
    Functions,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let cwd = std::env::current_dir()?;
    let mut config = Config::discover(cli.config.as_deref(), &cwd)?;
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let session = cli::Session::new(config);
    match cli.command {
        Commands::Dfs {
            edges,
            start,
            roots,
        } => cli::dfs::run(&session, &edges, start, roots.as_deref()),
        Commands::NextSibling { tree } => cli::next_sibling::run(&session, &tree),
        Commands::Functions => cli::functions::run(&session),
    }
}
