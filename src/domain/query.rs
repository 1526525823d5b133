//! Read-only helpers on node lists and forests.
//!
//! `depth`, `leaves` and `branches` assume an acyclic forest, which is what
//! [`crate::domain::make()`] returns from its roots.

use std::collections::HashMap;

use tracing::instrument;

use crate::domain::traits::{Hierarchical, Identifiable, ParentAware};
use crate::domain::walk::walk;

/// Ids occurring more than once in `nodes`, each reported once, in order of the
/// second occurrence.
#[instrument(level = "debug", skip_all)]
pub fn duplicate_ids<N: Identifiable>(nodes: &[N]) -> Vec<N::Id> {
    let mut counts: HashMap<N::Id, usize> = HashMap::with_capacity(nodes.len());
    let mut duplicates = Vec::new();
    for node in nodes {
        let id = node.id();
        let count = counts.entry(id.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Ids of the nodes in `nodes` that [`crate::domain::make()`] leaves unreachable from
/// every root, in input order.
///
/// These are the members of parent cycles, self-parented nodes included, and the
/// nodes hanging below them. Reachability follows the links `make` creates, position
/// by position, so a cycle member sharing its id with a reachable node is still
/// reported.
#[instrument(level = "debug", skip_all)]
pub fn detached_ids<N: ParentAware>(nodes: &[N]) -> Vec<N::Id> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Reach {
        Unknown,
        OnPath,
        Attached,
        Detached,
    }

    // later nodes win the slot, as in `make`
    let mut by_id: HashMap<N::Id, usize> = HashMap::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        by_id.insert(node.id(), pos);
    }
    let parents: Vec<Option<usize>> = nodes
        .iter()
        .map(|node| by_id.get(&node.parent_id()).copied())
        .collect();

    let mut reach = vec![Reach::Unknown; nodes.len()];
    let mut path = Vec::new();
    for start in 0..nodes.len() {
        let mut pos = start;
        let resolved = loop {
            match reach[pos] {
                Reach::Attached => break Reach::Attached,
                Reach::Detached | Reach::OnPath => break Reach::Detached,
                Reach::Unknown => {
                    reach[pos] = Reach::OnPath;
                    path.push(pos);
                    match parents[pos] {
                        Some(parent) => pos = parent,
                        None => break Reach::Attached,
                    }
                }
            }
        };
        for pos in path.drain(..) {
            reach[pos] = resolved;
        }
    }

    nodes
        .iter()
        .zip(reach)
        .filter(|(_, reach)| *reach == Reach::Detached)
        .map(|(node, _)| node.id())
        .collect()
}

/// All nodes of `forest` in pre-order.
pub fn flatten<N: Hierarchical + Clone>(forest: &[N], parent_id: &N::Id) -> Vec<N> {
    let mut flat = Vec::new();
    walk(forest, parent_id, |_, node, _| {
        flat.push(node.clone());
        true
    });
    flat
}

/// Number of levels in `forest`; 0 if it is empty.
#[instrument(level = "debug", skip_all)]
pub fn depth<N: Hierarchical>(forest: &[N]) -> usize {
    let mut max_depth = 0;
    let mut stack: Vec<(N, usize)> = Vec::new();
    for tree in forest {
        max_depth = max_depth.max(1);
        stack.extend(tree.children().into_iter().map(|child| (child, 2)));
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children().into_iter().map(|child| (child, depth + 1)));
        }
    }
    max_depth
}

/// Nodes without children, in pre-order.
pub fn leaves<N: Hierarchical + Clone>(forest: &[N], parent_id: &N::Id) -> Vec<N> {
    let mut leaves = Vec::new();
    walk(forest, parent_id, |_, node, _| {
        if node.children().is_empty() {
            leaves.push(node.clone());
        }
        true
    });
    leaves
}

/// Root-to-leaf id paths, in pre-order of their leaves.
#[instrument(level = "debug", skip_all)]
pub fn branches<N: Hierarchical>(forest: &[N]) -> Vec<Vec<N::Id>> {
    let mut paths = Vec::new();
    let mut stack: Vec<(N, Vec<N::Id>)> = Vec::new();
    for tree in forest {
        let children = tree.children();
        let path = vec![tree.id()];
        if children.is_empty() {
            paths.push(path);
            continue;
        }
        stack.extend(children.into_iter().rev().map(|child| (child, path.clone())));
        while let Some((node, mut path)) = stack.pop() {
            path.push(node.id());
            let children = node.children();
            if children.is_empty() {
                paths.push(path);
            } else {
                stack.extend(children.into_iter().rev().map(|child| (child, path.clone())));
            }
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::make;
    use crate::record::RecordNode;
    use crate::util::testing::{ids, init_test_setup, sample_forest, sample_records};
    use rstest::rstest;

    #[ctor::ctor]
    fn init() {
        init_test_setup();
    }

    #[test]
    fn given_repeated_ids_when_listing_duplicates_then_reports_each_once() {
        let nodes: Vec<_> = [1, 2, 1, 3, 2, 1]
            .into_iter()
            .map(|id| RecordNode::new(id, 0))
            .collect();
        assert_eq!(duplicate_ids(&nodes), vec![1, 2]);
    }

    #[test]
    fn given_unique_ids_when_listing_duplicates_then_empty() {
        assert!(duplicate_ids(&sample_records()).is_empty());
    }

    #[test]
    fn given_parent_cycle_when_making_then_both_nodes_are_detached() {
        let nodes = vec![
            RecordNode::new(1, 2),
            RecordNode::new(2, 1),
            RecordNode::new(3, 0),
            RecordNode::new(4, 4),
        ];
        let roots = make(&nodes);

        assert_eq!(ids(&roots), vec![3]);
        assert_eq!(detached_ids(&nodes), vec![1, 2, 4]);
    }

    #[test]
    fn given_cycle_member_sharing_root_id_when_making_then_cycle_is_detached() {
        let nodes = vec![
            RecordNode::new(5, 0),
            RecordNode::new(5, 6),
            RecordNode::new(6, 5),
        ];
        let roots = make(&nodes);

        assert_eq!(ids(&roots), vec![5]);
        assert!(roots[0].ptr_eq(&nodes[0]));
        assert_eq!(detached_ids(&nodes), vec![5, 6]);
    }

    #[test]
    fn given_node_below_cycle_when_making_then_it_is_detached_too() {
        let nodes = vec![
            RecordNode::new(3, 1),
            RecordNode::new(1, 2),
            RecordNode::new(2, 1),
            RecordNode::new(9, 0),
        ];
        make(&nodes);
        assert_eq!(detached_ids(&nodes), vec![3, 1, 2]);
    }

    #[test]
    fn given_acyclic_records_when_making_then_nothing_is_detached() {
        let nodes = sample_records();
        make(&nodes);
        assert!(detached_ids(&nodes).is_empty());
    }

    #[test]
    fn given_made_forest_when_flattening_then_reproduces_input_ids_once_each() {
        let nodes = sample_records();
        let roots = make(&nodes);

        let mut flat = ids(&flatten(&roots, &0));
        let mut input = ids(&nodes);
        flat.sort_unstable();
        input.sort_unstable();
        assert_eq!(flat, input);
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![RecordNode::new(1, 0)], 1)]
    #[case(sample_forest(), 3)]
    fn given_forest_when_measuring_depth_then_counts_levels(
        #[case] forest: Vec<RecordNode>,
        #[case] expected: usize,
    ) {
        assert_eq!(depth(&forest), expected);
    }

    #[test]
    fn given_sample_forest_when_collecting_leaves_then_returns_preorder_leaves() {
        assert_eq!(ids(&leaves(&sample_forest(), &0)), vec![11, 121, 122, 21, 22, 3]);
    }

    #[test]
    fn given_sample_forest_when_listing_branches_then_returns_root_to_leaf_paths() {
        assert_eq!(
            branches(&sample_forest()),
            vec![
                vec![1, 11],
                vec![1, 12, 121],
                vec![1, 12, 122],
                vec![2, 21],
                vec![2, 22],
                vec![3],
            ]
        );
    }
}
