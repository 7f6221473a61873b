//! `graph-search dfs` command implementation.

use std::path::Path;

use graph_search::function::{GRAPH_REACHABLE_DFS, GRAPH_REACHABLE_DFS_MULTIROOT};
use graph_search::{Argument, Value};

use super::Session;
use crate::error::Result;

/// Run the dfs command.
///
/// With `roots`, every `node_id` in that relation starts a tree of the
/// forest. Otherwise the walk starts at `start`; no start means NULL, which
/// yields an empty result.
pub fn run(session: &Session, edges: &Path, start: Option<i64>, roots: Option<&Path>) -> Result<()> {
    match roots {
        Some(roots) => {
            let edges = session.read(edges, GRAPH_REACHABLE_DFS_MULTIROOT, 0)?;
            let roots = session.read(roots, GRAPH_REACHABLE_DFS_MULTIROOT, 1)?;
            session.call_to_stdout(
                GRAPH_REACHABLE_DFS_MULTIROOT,
                &[Argument::Table(&edges), Argument::Table(&roots)],
            )
        }
        None => {
            let edges = session.read(edges, GRAPH_REACHABLE_DFS, 0)?;
            session.call_to_stdout(
                GRAPH_REACHABLE_DFS,
                &[Argument::Table(&edges), Argument::Scalar(Value::from(start))],
            )
        }
    }
}
