//! Property tests for the traversal algorithms.
//!
//! Random graphs are small and dense on purpose so cycles, self-loops,
//! duplicate edges and reconvergent paths are all common. petgraph serves as
//! an independent oracle for which nodes are reachable.

use std::collections::{HashMap, HashSet};

use graph_search::{
    Adjacency, Edge, NodeId, ParentRow, SiblingGroups, TreeRow, next_sibling, reachable_dfs,
    reachable_dfs_multiroot,
};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use proptest::prelude::*;

fn edges_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..12, 0i64..12), 0..40)
}

fn tree_strategy() -> impl Strategy<Value = Vec<(i64, Option<i64>, i64)>> {
    prop::collection::vec((prop::option::of(0i64..6), -3i64..3), 0..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (parent, key))| (i64::try_from(i).unwrap_or(i64::MAX), parent, key))
            .collect()
    })
}

fn adjacency(raw: &[(i64, i64)]) -> Adjacency {
    Adjacency::from_edges(raw.iter().copied().map(Edge::from))
}

fn oracle_reachable(raw: &[(i64, i64)], start: i64) -> HashSet<i64> {
    let mut graph: DiGraphMap<i64, ()> = DiGraphMap::new();
    for &(s, d) in raw {
        graph.add_edge(s, d, ());
    }
    graph.add_node(start);

    let mut reached = HashSet::new();
    let mut dfs = Dfs::new(&graph, start);
    while let Some(node) = dfs.next(&graph) {
        reached.insert(node);
    }
    reached
}

fn node_set(rows: &[ParentRow]) -> HashSet<i64> {
    rows.iter().map(|r| r.node.as_i64()).collect()
}

proptest! {
    #[test]
    fn dfs_reaches_exactly_the_oracle_set(raw in edges_strategy(), start in 0i64..14) {
        let rows = reachable_dfs(&adjacency(&raw), Some(NodeId(start)));

        if raw.is_empty() {
            prop_assert!(rows.is_empty());
        } else {
            prop_assert_eq!(node_set(&rows), oracle_reachable(&raw, start));
        }
    }

    #[test]
    fn dfs_rows_are_unique_and_rooted_once(raw in edges_strategy(), start in 0i64..12) {
        let rows = reachable_dfs(&adjacency(&raw), Some(NodeId(start)));

        prop_assert_eq!(node_set(&rows).len(), rows.len());
        let roots: Vec<_> = rows.iter().filter(|r| r.parent.is_none()).collect();
        if !rows.is_empty() {
            prop_assert_eq!(roots.len(), 1);
            prop_assert_eq!(rows[0].node, NodeId(start));
            prop_assert_eq!(rows[0].parent, None);
        }
    }

    #[test]
    fn dfs_parent_links_are_input_edges_visited_earlier(raw in edges_strategy(), start in 0i64..12) {
        let rows = reachable_dfs(&adjacency(&raw), Some(NodeId(start)));
        let edge_set: HashSet<(i64, i64)> = raw.iter().copied().collect();
        let position: HashMap<NodeId, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.node, i)).collect();

        for (i, row) in rows.iter().enumerate() {
            if let Some(parent) = row.parent {
                prop_assert!(edge_set.contains(&(parent.as_i64(), row.node.as_i64())));
                prop_assert!(position[&parent] < i);
            }
        }
    }

    #[test]
    fn dfs_is_deterministic(raw in edges_strategy(), start in 0i64..12) {
        let first = reachable_dfs(&adjacency(&raw), Some(NodeId(start)));
        let second = reachable_dfs(&adjacency(&raw), Some(NodeId(start)));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn multiroot_first_tree_matches_single_start(
        raw in edges_strategy(),
        roots in prop::collection::vec(0i64..12, 1..5),
    ) {
        let adj = adjacency(&raw);
        let forest = reachable_dfs_multiroot(&adj, roots.iter().copied().map(NodeId));
        let single = reachable_dfs(&adj, Some(NodeId(roots[0])));

        prop_assert!(forest.starts_with(&single));
        prop_assert_eq!(node_set(&forest).len(), forest.len());
    }

    #[test]
    fn next_sibling_chains_each_group_in_order(raw in tree_strategy()) {
        let rows: Vec<TreeRow> = raw
            .iter()
            .map(|&(node, parent, sort_key)| TreeRow {
                node: NodeId(node),
                parent: parent.map(NodeId),
                sort_key,
            })
            .collect();
        let result = next_sibling(&SiblingGroups::from_rows(rows.iter().copied()));

        prop_assert_eq!(result.len(), rows.len());

        let by_node: HashMap<NodeId, &TreeRow> = rows.iter().map(|r| (r.node, r)).collect();
        for row in &result {
            if let Some(next) = row.next {
                let here = by_node[&row.node];
                let there = by_node[&next];
                prop_assert_eq!(here.parent, there.parent);
                prop_assert!((here.sort_key, here.node) < (there.sort_key, there.node));
            }
        }

        let parents: HashSet<Option<NodeId>> = rows.iter().map(|r| r.parent).collect();
        let ends = result.iter().filter(|r| r.next.is_none()).count();
        prop_assert_eq!(ends, parents.len());
    }
}
