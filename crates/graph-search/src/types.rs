//! Row types shared by the traversal algorithms.
//!
//! The algorithms work on plain typed rows rather than on [`Table`]s so they
//! can be driven directly from Rust without going through the function host
//! layer:
//! - **Inputs**: `Edge`, `TreeRow`
//! - **Outputs**: `ParentRow`, `SiblingRow`
//!
//! A "no value" is always modelled as `None`; the table layer turns it into
//! a NULL cell.
//!
//! [`Table`]: crate::table::Table

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque node identifier.
///
/// Node ids are never declared up front: the node universe of an invocation
/// is whatever ids show up in its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge `source -> dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Node the edge leaves.
    pub source: NodeId,
    /// Node the edge enters.
    pub dest: NodeId,
}

impl Edge {
    /// Create an edge from raw ids.
    #[must_use]
    pub fn new(source: i64, dest: i64) -> Self {
        Self {
            source: NodeId(source),
            dest: NodeId(dest),
        }
    }
}

impl From<(i64, i64)> for Edge {
    fn from((source, dest): (i64, i64)) -> Self {
        Self::new(source, dest)
    }
}

/// One row of a parent-linked tree relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    /// The node this row describes. Expected to be unique within a relation.
    pub node: NodeId,
    /// The node's parent, `None` for roots.
    pub parent: Option<NodeId>,
    /// Caller-supplied ordering key among siblings. Not required unique.
    pub sort_key: i64,
}

impl TreeRow {
    /// Create a row with a parent.
    #[must_use]
    pub fn new(node: i64, parent: i64, sort_key: i64) -> Self {
        Self {
            node: NodeId(node),
            parent: Some(NodeId(parent)),
            sort_key,
        }
    }

    /// Create a row with no parent.
    #[must_use]
    pub fn root(node: i64, sort_key: i64) -> Self {
        Self {
            node: NodeId(node),
            parent: None,
            sort_key,
        }
    }
}

/// One row of a DFS spanning forest: `node` was first discovered from `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRow {
    /// The node that was reached.
    pub node: NodeId,
    /// The node it was discovered from, `None` for a start node.
    pub parent: Option<NodeId>,
}

/// One row of a next-sibling relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingRow {
    /// The node.
    pub node: NodeId,
    /// The node's successor among its siblings, `None` for the last sibling.
    pub next: Option<NodeId>,
}
