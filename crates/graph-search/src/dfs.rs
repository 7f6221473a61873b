//! Reachability depth-first search.
//!
//! Produces the spanning forest of a DFS as `(node, parent)` rows in
//! pre-order. Each node has two states: unvisited (absent from the visited
//! set) and visited. There is no in-progress state, so cycles, self-loops
//! and duplicate edges are all handled by the same visited-set guard.
//!
//! ## Ordering
//!
//! Among the outgoing edges of a node, the destination listed first in the
//! input is explored first, subtree and all, before any later sibling. The
//! walk uses an explicit stack, so children are pushed in reverse to pop in
//! input order. This rule is what fixes the parent of a node reachable along
//! several paths.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::adjacency::Adjacency;
use crate::types::{NodeId, ParentRow};

/// Walk state shared across the roots of one invocation.
struct Walker<'a> {
    adjacency: &'a Adjacency,
    visited: HashSet<NodeId>,
    stack: Vec<(NodeId, Option<NodeId>)>,
    rows: Vec<ParentRow>,
}

impl<'a> Walker<'a> {
    fn new(adjacency: &'a Adjacency) -> Self {
        Self {
            adjacency,
            visited: HashSet::new(),
            stack: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Explore everything reachable from `root` that is not yet visited.
    ///
    /// Returns `false` if `root` itself was already visited.
    fn walk_from(&mut self, root: NodeId) -> bool {
        if self.visited.contains(&root) {
            return false;
        }

        self.stack.push((root, None));
        while let Some((node, parent)) = self.stack.pop() {
            if !self.visited.insert(node) {
                continue;
            }
            trace!(%node, parent = ?parent, "visit");
            self.rows.push(ParentRow { node, parent });

            for &child in self.adjacency.children(node).iter().rev() {
                if !self.visited.contains(&child) {
                    self.stack.push((child, Some(node)));
                }
            }
        }
        true
    }

    fn finish(self) -> Vec<ParentRow> {
        self.rows
    }
}

/// Depth-first search from a single start node.
///
/// Returns an empty result when `start` is `None` or the graph has no edges.
/// A start node with no outgoing edges yields just `(start, None)`.
#[must_use]
pub fn reachable_dfs(adjacency: &Adjacency, start: Option<NodeId>) -> Vec<ParentRow> {
    let Some(start) = start else {
        debug!("no start node, returning empty result");
        return Vec::new();
    };
    if adjacency.is_empty() {
        debug!(%start, "empty edge relation, returning empty result");
        return Vec::new();
    }

    let mut walker = Walker::new(adjacency);
    walker.walk_from(start);
    let rows = walker.finish();

    debug!(%start, reached = rows.len(), "reachable dfs complete");
    rows
}

/// Depth-first search from several roots, producing a spanning forest.
///
/// Roots are walked in the given order with one shared visited set. A root
/// already reached from an earlier root keeps its discovered parent and does
/// not start a new tree. Every root that does start a tree has a `None` parent.
#[must_use]
pub fn reachable_dfs_multiroot<I>(adjacency: &Adjacency, roots: I) -> Vec<ParentRow>
where
    I: IntoIterator<Item = NodeId>,
{
    if adjacency.is_empty() {
        debug!("empty edge relation, returning empty result");
        return Vec::new();
    }

    let mut walker = Walker::new(adjacency);
    let mut trees = 0usize;
    for root in roots {
        if walker.walk_from(root) {
            trees += 1;
        } else {
            trace!(%root, "root already reached");
        }
    }
    let rows = walker.finish();

    debug!(trees, reached = rows.len(), "multi-root dfs complete");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    fn graph(raw: &[(i64, i64)]) -> Adjacency {
        Adjacency::from_edges(raw.iter().copied().map(Edge::from))
    }

    fn pairs(rows: &[ParentRow]) -> Vec<(i64, Option<i64>)> {
        rows.iter()
            .map(|r| (r.node.as_i64(), r.parent.map(NodeId::as_i64)))
            .collect()
    }

    #[test]
    fn null_start_is_empty() {
        assert!(reachable_dfs(&graph(&[(1, 2)]), None).is_empty());
    }

    #[test]
    fn empty_graph_is_empty() {
        assert!(reachable_dfs(&graph(&[]), Some(NodeId(1))).is_empty());
    }

    #[test]
    fn self_loop_does_not_revisit() {
        let rows = reachable_dfs(&graph(&[(5, 10), (10, 10)]), Some(NodeId(5)));
        assert_eq!(pairs(&rows), vec![(5, None), (10, Some(5))]);
    }

    #[test]
    fn first_listed_child_is_explored_first() {
        // 1 -> 2 -> 4, 1 -> 3 -> 4: 4 is found through 2 because 2 is listed first.
        let rows = reachable_dfs(&graph(&[(1, 2), (1, 3), (3, 4), (2, 4)]), Some(NodeId(1)));
        assert_eq!(
            pairs(&rows),
            vec![(1, None), (2, Some(1)), (4, Some(2)), (3, Some(1))]
        );
    }

    #[test]
    fn deeper_discovery_wins_over_pending_sibling_edge() {
        // 1 -> 2, 1 -> 3 and 2 -> 3: 3 is reached inside 2's subtree first.
        let rows = reachable_dfs(&graph(&[(1, 2), (1, 3), (2, 3)]), Some(NodeId(1)));
        assert_eq!(pairs(&rows), vec![(1, None), (2, Some(1)), (3, Some(2))]);
    }

    #[test]
    fn start_without_edges_is_reported_alone() {
        let rows = reachable_dfs(&graph(&[(1, 2)]), Some(NodeId(99)));
        assert_eq!(pairs(&rows), vec![(99, None)]);
    }

    #[test]
    fn multiroot_skips_roots_already_reached() {
        let adj = graph(&[(1, 2), (2, 3), (7, 2), (7, 8)]);
        let rows = reachable_dfs_multiroot(&adj, [NodeId(1), NodeId(3), NodeId(7)]);
        assert_eq!(
            pairs(&rows),
            vec![(1, None), (2, Some(1)), (3, Some(2)), (7, None), (8, Some(7))]
        );
    }

    #[test]
    fn multiroot_with_no_roots_is_empty() {
        assert!(reachable_dfs_multiroot(&graph(&[(1, 2)]), []).is_empty());
    }

    #[test]
    fn multiroot_repeated_root_appears_once() {
        let rows = reachable_dfs_multiroot(&graph(&[(1, 2)]), [NodeId(1), NodeId(1)]);
        assert_eq!(pairs(&rows), vec![(1, None), (2, Some(1))]);
    }
}
