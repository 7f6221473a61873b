//! `graph-search next-sibling` command implementation.

use std::path::Path;

use graph_search::Argument;
use graph_search::function::GRAPH_NEXT_SIBLING;

use super::Session;
use crate::error::Result;

/// Run the next-sibling command.
pub fn run(session: &Session, tree: &Path) -> Result<()> {
    let tree = session.read(tree, GRAPH_NEXT_SIBLING, 0)?;
    session.call_to_stdout(GRAPH_NEXT_SIBLING, &[Argument::Table(&tree)])
}
