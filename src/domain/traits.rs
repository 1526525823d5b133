//! Capability contracts a node type has to satisfy.
//!
//! Traversal needs [`Identifiable`] and [`Hierarchical`]. Construction additionally
//! needs [`ParentAware`] and [`ChildMutable`].
//!
//! Nodes are expected to be shared handles (typically `Rc<RefCell<T>>` or a newtype
//! around it): cloning a node clones the handle, and [`ChildMutable::set_children`]
//! mutates the record behind it through `&self`. The forest builder relies on this to
//! link nodes it does not own.

use std::hash::Hash;

/// Exposes an identifier usable as a map key.
pub trait Identifiable {
    type Id: Clone + Eq + Hash;

    fn id(&self) -> Self::Id;
}

/// Exposes the ordered child sequence of a node.
pub trait Hierarchical: Identifiable + Sized {
    /// Snapshot of the current children, in order.
    fn children(&self) -> Vec<Self>;
}

/// Exposes the identifier of the node's parent.
pub trait ParentAware: Identifiable {
    fn parent_id(&self) -> Self::Id;
}

/// Allows replacing the child sequence of a node.
pub trait ChildMutable: Hierarchical {
    fn set_children(&self, children: Vec<Self>);

    /// Appends `child` after the existing children.
    ///
    /// The default goes through [`Hierarchical::children`] and
    /// [`ChildMutable::set_children`]; handle types with direct access to their
    /// child list should override it.
    fn push_child(&self, child: Self) {
        let mut children = self.children();
        children.push(child);
        self.set_children(children);
    }
}
