//! Domain layer: capability traits and the forest algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading)
//! and of any concrete node type.

pub mod error;
pub mod make;
pub mod query;
pub mod traits;
pub mod walk;

pub use error::{TreeError, TreeResult};
pub use make::{make, make_strict};
pub use query::{branches, depth, detached_ids, duplicate_ids, flatten, leaves};
pub use traits::{ChildMutable, Hierarchical, Identifiable, ParentAware};
pub use walk::{walk, walk_checked, walk_recursive};
