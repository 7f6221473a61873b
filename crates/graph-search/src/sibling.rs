//! Next-sibling resolution over a parent-linked forest.
//!
//! For every node, the successor among nodes sharing its parent value in
//! ascending `(sort_key, node)` order. The last node of each group (and any
//! node alone under its parent) has no successor.

use tracing::debug;

use crate::adjacency::SiblingGroups;
use crate::types::{NodeId, SiblingRow};

/// Resolve the next sibling of every grouped node.
///
/// Rows are emitted group by group, groups in the order their parent value
/// first appeared in the input, members in sibling order.
#[must_use]
pub fn next_sibling(groups: &SiblingGroups) -> Vec<SiblingRow> {
    let mut rows = Vec::with_capacity(groups.node_count());

    for group in groups.groups() {
        let successors = group
            .members
            .iter()
            .skip(1)
            .copied()
            .map(Some)
            .chain(std::iter::once(None::<NodeId>));
        for (&node, next) in group.members.iter().zip(successors) {
            rows.push(SiblingRow { node, next });
        }
    }

    debug!(
        rows = rows.len(),
        groups = groups.groups().len(),
        "next sibling complete"
    );
    rows
}
