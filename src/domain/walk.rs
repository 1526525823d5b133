//! Pre-order depth-first traversal over an already linked forest.
//!
//! The visitor receives `(sibling_index, node, parent_id)` for every node before its
//! children are descended into, and stops the whole traversal by returning `false`.
//!
//! There is no cycle detection in [`walk`] or [`walk_recursive`]: if a node can reach
//! itself through child links, the traversal only ends when the visitor says so.
//! [`walk_checked`] is the separately named variant that guards against this.

use std::collections::HashMap;
use std::fmt::Debug;

use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::traits::Hierarchical;

/// One level of the explicit work-stack: the children of a visited node and the
/// position of the next one to visit.
struct Frame<N: Hierarchical> {
    siblings: Vec<N>,
    next: usize,
    parent_id: N::Id,
}

impl<N: Hierarchical> Frame<N> {
    fn below(node: &N) -> Self {
        Self {
            siblings: node.children(),
            next: 0,
            parent_id: node.id(),
        }
    }
}

/// Walks `forest` in pre-order, calling `visit` before descending into each node.
///
/// `parent_id` is handed to `visit` for the top-level nodes, usually a "no parent"
/// sentinel. Returns `false` as soon as `visit` returns `false`, without visiting
/// anything else; returns `true` once every reachable node has been visited.
///
/// Uses an explicit stack, so depth is bounded by memory rather than by the call
/// stack. Children are read after `visit` returns, so changes `visit` makes to the
/// node's own fields are observed. Changing the child sequence of the visited node or
/// of its ancestors while walking has no defined effect on the rest of the walk.
#[instrument(level = "trace", skip_all)]
pub fn walk<N, F>(forest: &[N], parent_id: &N::Id, mut visit: F) -> bool
where
    N: Hierarchical,
    F: FnMut(usize, &N, &N::Id) -> bool,
{
    for (index, tree) in forest.iter().enumerate() {
        if !visit(index, tree, parent_id) {
            return false;
        }
        if !walk_descendants(tree, &mut visit) {
            return false;
        }
    }
    true
}

fn walk_descendants<N, F>(root: &N, visit: &mut F) -> bool
where
    N: Hierarchical,
    F: FnMut(usize, &N, &N::Id) -> bool,
{
    let mut stack = vec![Frame::below(root)];

    while let Some(frame) = stack.last_mut() {
        let index = frame.next;
        let Some(node) = frame.siblings.get(index) else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        if !visit(index, node, &frame.parent_id) {
            return false;
        }
        let below = Frame::below(node);
        stack.push(below);
    }
    true
}

/// Same contract as [`walk`], using native recursion.
///
/// Recursion depth equals forest depth; prefer [`walk`] for input of unknown depth.
pub fn walk_recursive<N, F>(forest: &[N], parent_id: &N::Id, mut visit: F) -> bool
where
    N: Hierarchical,
    F: FnMut(usize, &N, &N::Id) -> bool,
{
    fn recurse<N, F>(forest: &[N], parent_id: &N::Id, visit: &mut F) -> bool
    where
        N: Hierarchical,
        F: FnMut(usize, &N, &N::Id) -> bool,
    {
        for (index, tree) in forest.iter().enumerate() {
            if !visit(index, tree, parent_id) {
                return false;
            }
            if !recurse(&tree.children(), &tree.id(), visit) {
                return false;
            }
        }
        true
    }

    recurse(forest, parent_id, &mut visit)
}

/// Cycle-safe variant of [`walk`].
///
/// Tracks the identifiers on the current ancestor path. A node whose identifier is
/// already on that path is not visited; instead the walk ends with
/// [`TreeError::CycleDetected`]. Nodes reachable along several paths (diamonds) are
/// visited once per path, like [`walk`] does.
///
/// Returns `Ok(false)` if `visit` stopped the walk and `Ok(true)` if it completed.
#[instrument(level = "debug", skip_all)]
pub fn walk_checked<N, F>(forest: &[N], parent_id: &N::Id, mut visit: F) -> TreeResult<bool, N::Id>
where
    N: Hierarchical,
    N::Id: Debug,
    F: FnMut(usize, &N, &N::Id) -> bool,
{
    // id -> number of times it occurs on the current path (0 or 1 unless cyclic)
    let mut ancestors: HashMap<N::Id, usize> = HashMap::new();

    for (index, tree) in forest.iter().enumerate() {
        if !visit(index, tree, parent_id) {
            return Ok(false);
        }

        ancestors.clear();
        ancestors.insert(tree.id(), 1);
        let mut stack = vec![Frame::below(tree)];

        while let Some(frame) = stack.last_mut() {
            let index = frame.next;
            let Some(node) = frame.siblings.get(index) else {
                if let Some(done) = stack.pop() {
                    leave(&mut ancestors, &done.parent_id);
                }
                continue;
            };
            frame.next += 1;

            let id = node.id();
            if ancestors.get(&id).is_some_and(|count| *count > 0) {
                debug!(?id, parent_id = ?frame.parent_id, "cycle detected");
                return Err(TreeError::CycleDetected {
                    id,
                    parent_id: frame.parent_id.clone(),
                });
            }
            if !visit(index, node, &frame.parent_id) {
                return Ok(false);
            }
            let below = Frame::below(node);
            *ancestors.entry(id).or_insert(0) += 1;
            stack.push(below);
        }
    }
    Ok(true)
}

fn leave<Id: std::hash::Hash + Eq>(ancestors: &mut HashMap<Id, usize>, id: &Id) {
    if let Some(count) = ancestors.get_mut(id) {
        *count = count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identifiable;
    use crate::record::RecordNode;
    use crate::util::testing::{init_test_setup, sample_forest};

    #[ctor::ctor]
    fn init() {
        init_test_setup();
    }

    fn collect(forest: &[RecordNode], stop_at: Option<i64>) -> (Vec<i64>, bool) {
        let mut seen = Vec::new();
        let completed = walk(forest, &0, |_, node, _| {
            seen.push(node.id());
            Some(node.id()) != stop_at
        });
        (seen, completed)
    }

    #[test]
    fn given_sample_forest_when_walking_then_visits_in_preorder() {
        let (seen, completed) = collect(&sample_forest(), None);
        assert_eq!(seen, vec![1, 11, 12, 121, 122, 2, 21, 22, 3]);
        assert!(completed);
    }

    #[test]
    fn given_visitor_stopping_at_121_when_walking_then_halts_everywhere() {
        let (seen, completed) = collect(&sample_forest(), Some(121));
        assert_eq!(seen, vec![1, 11, 12, 121]);
        assert!(!completed);
    }

    #[test]
    fn given_visitor_stopping_at_first_root_when_walking_then_visits_nothing_else() {
        let (seen, completed) = collect(&sample_forest(), Some(1));
        assert_eq!(seen, vec![1]);
        assert!(!completed);
    }

    #[test]
    fn given_empty_forest_when_walking_then_completes_without_visiting() {
        let (seen, completed) = collect(&[], None);
        assert!(seen.is_empty());
        assert!(completed);
    }

    #[test]
    fn given_visitor_stamping_fields_when_walking_then_changes_are_kept() {
        let forest = sample_forest();
        walk(&forest, &0, |index, node, parent_id| {
            let mut record = node.borrow_mut();
            record.seq = index + 1;
            record.parent_id = *parent_id;
            true
        });

        let mut stamped = Vec::new();
        walk(&forest, &0, |_, node, _| {
            let record = node.borrow();
            stamped.push((record.id, record.seq, record.parent_id));
            true
        });
        assert_eq!(
            stamped,
            vec![
                (1, 1, 0),
                (11, 1, 1),
                (12, 2, 1),
                (121, 1, 12),
                (122, 2, 12),
                (2, 2, 0),
                (21, 1, 2),
                (22, 2, 2),
                (3, 3, 0),
            ]
        );
    }

    #[test]
    fn given_deep_chain_when_walking_then_does_not_overflow_stack() {
        let root = RecordNode::new(0, -1);
        let mut tail = root.clone();
        for id in 1..100_000 {
            let next = RecordNode::new(id, id - 1);
            tail.borrow_mut().children.push(next.clone());
            tail = next;
        }

        let mut count = 0;
        assert!(walk(&[root], &-1, |_, _, _| {
            count += 1;
            true
        }));
        assert_eq!(count, 100_000);
    }

    #[test]
    fn given_any_stop_point_when_comparing_walks_then_recursive_and_stack_agree() {
        let forest = sample_forest();
        for stop_at in [None, Some(1), Some(12), Some(122), Some(2), Some(3)] {
            let mut recursive = Vec::new();
            let recursive_done = walk_recursive(&forest, &0, |index, node, parent_id| {
                recursive.push((index, node.id(), *parent_id));
                Some(node.id()) != stop_at
            });
            let mut stacked = Vec::new();
            let stacked_done = walk(&forest, &0, |index, node, parent_id| {
                stacked.push((index, node.id(), *parent_id));
                Some(node.id()) != stop_at
            });
            assert_eq!(recursive, stacked);
            assert_eq!(recursive_done, stacked_done);
        }
    }

    #[test]
    fn given_two_node_cycle_when_walking_checked_then_reports_cycle() {
        let a = RecordNode::new(1, 0);
        let b = RecordNode::new(2, 0);
        a.borrow_mut().children.push(b.clone());
        b.borrow_mut().children.push(a.clone());

        let mut seen = Vec::new();
        let result = walk_checked(&[a, b], &0, |_, node, _| {
            seen.push(node.id());
            true
        });

        assert_eq!(result, Err(TreeError::CycleDetected { id: 1, parent_id: 2 }));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn given_diamond_when_walking_checked_then_visits_shared_node_per_path() {
        let shared = RecordNode::new(9, 0);
        let left = RecordNode::new(1, 0).with_children(vec![shared.clone()]);
        let right = RecordNode::new(2, 0).with_children(vec![shared]);

        let mut seen = Vec::new();
        let result = walk_checked(&[left, right], &0, |_, node, _| {
            seen.push(node.id());
            true
        });

        assert_eq!(result, Ok(true));
        assert_eq!(seen, vec![1, 9, 2, 9]);
    }

    #[test]
    fn given_sibling_subtrees_when_walking_checked_then_ancestor_path_is_unwound() {
        // 5 appears under both 1 and 2 at the same depth: not a cycle
        let forest = vec![
            RecordNode::new(1, 0).with_children(vec![
                RecordNode::new(5, 1).with_children(vec![RecordNode::new(6, 5)]),
                RecordNode::new(7, 1),
            ]),
            RecordNode::new(2, 0).with_children(vec![RecordNode::new(5, 2)]),
        ];
        let result = walk_checked(&forest, &0, |_, _, _| true);
        assert_eq!(result, Ok(true));
    }

    #[test]
    fn given_visitor_stop_when_walking_checked_then_returns_ok_false() {
        let result = walk_checked(&sample_forest(), &0, |_, node, _| node.id() != 12);
        assert_eq!(result, Ok(false));
    }
}
