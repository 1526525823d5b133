//! Forest construction from a flat list of nodes carrying parent references.

use std::collections::HashMap;
use std::fmt::Debug;

use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::query::duplicate_ids;
use crate::domain::traits::{ChildMutable, ParentAware};

/// Links `nodes` into a forest and returns its roots.
///
/// Pass 1 indexes every node by id; if ids repeat, the later node wins the slot.
/// Pass 2 appends every node, in input order, to the children of the node its
/// `parent_id` resolves to. Nodes whose parent does not resolve become roots, in
/// input order.
///
/// Nothing is copied: children and roots are clones of the handles passed in, so the
/// caller's nodes are the ones that get linked. Existing children are kept and new
/// ones appended after them.
///
/// There is no cycle prevention. Two nodes naming each other as parent become each
/// other's child and neither is returned as a root; a node naming itself becomes its
/// own child. See [`crate::domain::detached_ids`] to find such nodes afterwards.
#[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
pub fn make<N>(nodes: &[N]) -> Vec<N>
where
    N: ParentAware + ChildMutable + Clone,
{
    let mut by_id: HashMap<N::Id, &N> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        by_id.insert(node.id(), node);
    }

    let mut roots = Vec::new();
    for node in nodes {
        match by_id.get(&node.parent_id()) {
            Some(parent) => parent.push_child(node.clone()),
            None => roots.push(node.clone()),
        }
    }
    debug!(roots = roots.len(), "forest built");
    roots
}

/// Like [`make`], but refuses input where an id occurs more than once.
///
/// Returns [`TreeError::DuplicateId`] for the first repeated id in input order and
/// leaves every node untouched in that case.
pub fn make_strict<N>(nodes: &[N]) -> TreeResult<Vec<N>, N::Id>
where
    N: ParentAware + ChildMutable + Clone,
    N::Id: Debug,
{
    if let Some(id) = duplicate_ids(nodes).into_iter().next() {
        debug!(?id, "duplicate id, refusing to build");
        return Err(TreeError::DuplicateId { id });
    }
    Ok(make(nodes))
}
