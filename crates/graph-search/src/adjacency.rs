//! Adjacency construction from relational input.
//!
//! Both traversals start by turning a flat relation into a keyed index:
//!
//! - [`Adjacency`]: source node → destinations, in input edge order
//! - [`SiblingGroups`]: parent value → members, sorted by `(sort_key, node)`
//!
//! Neither index knows the node universe up front. A node that never
//! appears as a key simply has no entry, which reads the same as an empty
//! list. Indexes are built per invocation and never mutated afterwards.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::types::{Edge, NodeId, TreeRow};

/// Outgoing adjacency lists keyed by source node.
///
/// Each list preserves the order in which its edges appeared in the input,
/// duplicates included. Traversals rely on that order for tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    children: HashMap<NodeId, Vec<NodeId>>,
    edge_count: usize,
}

impl Adjacency {
    /// Build the index from edges in input order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut edge_count = 0;
        for edge in edges {
            children.entry(edge.source).or_default().push(edge.dest);
            edge_count += 1;
        }

        debug!(
            edge_count,
            source_count = children.len(),
            "built adjacency index"
        );

        Self {
            children,
            edge_count,
        }
    }

    /// Destinations of `node` in input order. Empty if `node` has no outgoing edges.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edges consumed, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of distinct source nodes.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if no edges were consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

/// Nodes sharing one parent value, in sibling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingGroup {
    /// The shared parent value. `None` groups every parentless row together.
    pub parent: Option<NodeId>,
    /// Members sorted by ascending `(sort_key, node)`.
    pub members: Vec<NodeId>,
}

/// Tree rows grouped by parent value.
///
/// Groups are kept in the order their parent value was first seen.
/// Grouping goes through a slot map so iteration order never depends on hashing.
#[derive(Debug, Clone, Default)]
pub struct SiblingGroups {
    groups: Vec<SiblingGroup>,
    skipped: usize,
}

impl SiblingGroups {
    /// Group rows by parent and sort each group.
    ///
    /// A `node` that appears more than once keeps its first row; later rows
    /// for the same node are skipped and counted in [`skipped`](Self::skipped).
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TreeRow>,
    {
        let mut slots: HashMap<Option<NodeId>, usize> = HashMap::new();
        let mut keyed: Vec<(Option<NodeId>, Vec<(i64, NodeId)>)> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut skipped = 0;

        for row in rows {
            if !seen.insert(row.node) {
                debug!(node = %row.node, "skipping duplicate tree row");
                skipped += 1;
                continue;
            }
            let slot = *slots.entry(row.parent).or_insert_with(|| {
                keyed.push((row.parent, Vec::new()));
                keyed.len() - 1
            });
            keyed[slot].1.push((row.sort_key, row.node));
        }

        let groups: Vec<SiblingGroup> = keyed
            .into_iter()
            .map(|(parent, mut members)| {
                members.sort_unstable();
                SiblingGroup {
                    parent,
                    members: members.into_iter().map(|(_, node)| node).collect(),
                }
            })
            .collect();

        debug!(
            node_count = seen.len(),
            group_count = groups.len(),
            skipped,
            "built sibling groups"
        );

        Self { groups, skipped }
    }

    /// All groups, in first-seen parent order.
    #[must_use]
    pub fn groups(&self) -> &[SiblingGroup] {
        &self.groups
    }

    /// Number of duplicate rows that were ignored.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of distinct nodes grouped.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    fn edges(raw: &[(i64, i64)]) -> Vec<Edge> {
        raw.iter().copied().map(Edge::from).collect()
    }

    #[test]
    fn children_follow_input_order() {
        let adj = Adjacency::from_edges(edges(&[(1, 3), (2, 9), (1, 2), (1, 5)]));

        assert_eq!(adj.children(NodeId(1)), ids(&[3, 2, 5]).as_slice());
        assert_eq!(adj.children(NodeId(2)), ids(&[9]).as_slice());
        assert_eq!(adj.edge_count(), 4);
        assert_eq!(adj.source_count(), 2);
    }

    #[test]
    fn destination_only_node_has_no_children() {
        let adj = Adjacency::from_edges([Edge::new(1, 2)]);
        assert!(adj.children(NodeId(2)).is_empty());
        assert!(adj.children(NodeId(404)).is_empty());
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let adj = Adjacency::from_edges(edges(&[(4, 4), (4, 4)]));
        assert_eq!(adj.children(NodeId(4)), ids(&[4, 4]).as_slice());
    }

    #[test]
    fn empty_input_is_empty() {
        let adj = Adjacency::from_edges(std::iter::empty());
        assert!(adj.is_empty());
        assert_eq!(adj.source_count(), 0);
    }

    #[test]
    fn sibling_groups_sort_by_key_then_node() {
        let groups = SiblingGroups::from_rows([
            TreeRow::new(5, 1, 2),
            TreeRow::new(9, 1, 1),
            TreeRow::new(4, 1, 2),
            TreeRow::new(2, 1, 1),
        ]);

        assert_eq!(groups.groups().len(), 1);
        assert_eq!(groups.groups()[0].parent, Some(NodeId(1)));
        assert_eq!(groups.groups()[0].members, ids(&[2, 9, 4, 5]));
    }

    #[test]
    fn sibling_groups_keep_first_seen_parent_order() {
        let groups = SiblingGroups::from_rows([
            TreeRow::new(1, 30, 0),
            TreeRow::new(2, 10, 0),
            TreeRow::new(3, 30, 0),
            TreeRow::root(4, 0),
        ]);

        let parents: Vec<_> = groups.groups().iter().map(|g| g.parent).collect();
        assert_eq!(parents, vec![Some(NodeId(30)), Some(NodeId(10)), None]);
    }

    #[test]
    fn parentless_rows_share_one_group() {
        let groups = SiblingGroups::from_rows([TreeRow::root(8, 1), TreeRow::root(7, 0)]);

        assert_eq!(groups.groups().len(), 1);
        assert_eq!(groups.groups()[0].parent, None);
        assert_eq!(groups.groups()[0].members, ids(&[7, 8]));
    }

    #[test]
    fn duplicate_node_rows_keep_first_occurrence() {
        let groups = SiblingGroups::from_rows([
            TreeRow::new(1, 0, 5),
            TreeRow::new(1, 2, 0),
            TreeRow::new(3, 0, 1),
        ]);

        assert_eq!(groups.skipped(), 1);
        assert_eq!(groups.node_count(), 2);
        assert_eq!(groups.groups().len(), 1);
        assert_eq!(groups.groups()[0].parent, Some(NodeId(0)));
        assert_eq!(groups.groups()[0].members, ids(&[3, 1]));
    }
}
