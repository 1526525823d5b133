//! Rendering of nodes and forests for display: terminal trees and JSON.
//!
//! Rendering recurses along child links and must only be given acyclic forests,
//! such as the roots returned by `make`, no deeper than [`MAX_RENDER_DEPTH`].

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use termtree::Tree;
use tracing::instrument;

use crate::domain::Hierarchical;
use crate::record::RecordNode;

/// Deepest forest the tree and JSON renderers accept; each level costs a few stack
/// frames. Deeper forests can still be walked or listed as branches.
pub const MAX_RENDER_DEPTH: usize = 256;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for RecordNode {
    fn to_tree_string(&self) -> Tree<String> {
        term_tree(self, &RecordNode::label)
    }
}

/// Builds a `termtree` tree below `node`, labelling every node with `label`.
pub fn term_tree<N, L>(node: &N, label: &L) -> Tree<String>
where
    N: Hierarchical,
    L: Fn(&N) -> String,
{
    let leaves: Vec<_> = node
        .children()
        .iter()
        .map(|child| term_tree(child, label))
        .collect();

    Tree::new(label(node)).with_leaves(leaves)
}

/// One node without its children, as used for line-per-node output.
#[derive(Serialize)]
struct NodeLine<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    id: i64,
    #[serde(skip_serializing_if = "is_zero")]
    parent_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "is_zero")]
    seq: usize,
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Compact single-line JSON for `node`, leaving out its children.
pub fn node_line(node: &RecordNode) -> serde_json::Result<String> {
    let record = node.borrow();
    serde_json::to_string(&NodeLine {
        id: record.id,
        parent_id: record.parent_id,
        name: record.name.as_deref(),
        seq: record.seq,
    })
}

/// Pretty JSON array of the trees below `roots`, indented by `indent` spaces.
///
/// A root's `parent_id` names a node outside the forest and is left out.
#[instrument(level = "debug", skip(roots))]
pub fn forest_json(roots: &[RecordNode], indent: usize) -> serde_json::Result<String> {
    let mut trees = Vec::with_capacity(roots.len());
    for root in roots {
        let mut tree = serde_json::to_value(root)?;
        if let Some(object) = tree.as_object_mut() {
            object.remove("parent_id");
        }
        trees.push(tree);
    }

    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    trees.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde_json::Error::custom)
}
