//! Concrete node type used by the CLI: a flat JSON record behind a shared handle.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::domain::{ChildMutable, Hierarchical, Identifiable, ParentAware};

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Payload of a node.
///
/// Zero ids, zero sequence numbers and empty child lists are left out when
/// serialized, so a flat record prints as e.g. `{"id":11,"parent_id":1}`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub parent_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RecordNode>,
    /// 1-based position among siblings, stamped while walking.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub seq: usize,
}

// Unlinks descendants iteratively; deep chains would otherwise overflow the stack
// through recursive drops.
impl Drop for Record {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(node.0) {
                let mut record = cell.into_inner();
                pending.append(&mut record.children);
            }
        }
    }
}

/// Shared handle to a [`Record`].
///
/// Cloning the handle shares the record. Handles linked into a cycle keep each other
/// alive and are never freed.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordNode(Rc<RefCell<Record>>);

impl RecordNode {
    pub fn new(id: i64, parent_id: i64) -> Self {
        Self::from_record(Record {
            id,
            parent_id,
            name: None,
            children: Vec::new(),
            seq: 0,
        })
    }

    pub fn from_record(record: Record) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.borrow_mut().name = Some(name.into());
        self
    }

    pub fn with_children(self, children: Vec<RecordNode>) -> Self {
        self.borrow_mut().children = children;
        self
    }

    pub fn borrow(&self) -> Ref<'_, Record> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Record> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Display label: the id, followed by the name if there is one.
    pub fn label(&self) -> String {
        let record = self.borrow();
        match &record.name {
            Some(name) => format!("{} {}", record.id, name),
            None => record.id.to_string(),
        }
    }
}

impl fmt::Debug for RecordNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.borrow();
        // children by id only: the handles may form cycles
        let children: Vec<i64> = record.children.iter().map(|c| c.borrow().id).collect();
        f.debug_struct("RecordNode")
            .field("id", &record.id)
            .field("parent_id", &record.parent_id)
            .field("name", &record.name)
            .field("seq", &record.seq)
            .field("children", &children)
            .finish()
    }
}

impl Identifiable for RecordNode {
    type Id = i64;

    fn id(&self) -> i64 {
        self.borrow().id
    }
}

impl Hierarchical for RecordNode {
    fn children(&self) -> Vec<Self> {
        self.borrow().children.clone()
    }
}

impl ParentAware for RecordNode {
    fn parent_id(&self) -> i64 {
        self.borrow().parent_id
    }
}

impl ChildMutable for RecordNode {
    fn set_children(&self, children: Vec<Self>) {
        self.borrow_mut().children = children;
    }

    fn push_child(&self, child: Self) {
        self.borrow_mut().children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_flat_json_when_deserializing_then_defaults_missing_fields() {
        let nodes: Vec<RecordNode> =
            serde_json::from_str(r#"[{"id": 1}, {"id": 11, "parent_id": 1, "name": "leaf"}]"#)
                .unwrap();

        assert_eq!(nodes[0].parent_id(), 0);
        assert!(nodes[0].children().is_empty());
        assert_eq!(nodes[1].label(), "11 leaf");
    }

    #[test]
    fn given_record_when_serializing_then_omits_zero_and_empty_fields() {
        let node = RecordNode::new(11, 1);
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"{"id":11,"parent_id":1}"#);

        let root = RecordNode::new(1, 0).with_children(vec![node]);
        root.borrow_mut().seq = 1;
        assert_eq!(
            serde_json::to_string(&root).unwrap(),
            r#"{"id":1,"children":[{"id":11,"parent_id":1}],"seq":1}"#
        );
    }

    #[test]
    fn given_cloned_handle_when_mutating_then_both_see_change() {
        let node = RecordNode::new(1, 0);
        let alias = node.clone();
        alias.push_child(RecordNode::new(2, 1));

        assert!(node.ptr_eq(&alias));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn given_self_cycle_when_debug_printing_then_terminates() {
        let node = RecordNode::new(4, 4);
        node.push_child(node.clone());
        assert!(format!("{:?}", node).contains("children: [4]"));
    }
}
