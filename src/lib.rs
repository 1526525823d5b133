//! Forest construction and depth-first traversal over caller-defined nodes.
//!
//! The core lives in [`domain`]: [`domain::make()`] links a flat list of nodes carrying
//! parent ids into a forest, [`domain::walk()`] visits a forest in pre-order and can be
//! stopped by its visitor. Both only need the capability traits in
//! [`domain::traits`], so any node handle type can be used.
//!
//! [`record`], [`render`], [`config`] and [`cli`] make up the `rsforest` binary, which
//! reads flat JSON records and renders, walks or checks the resulting forest.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod record;
pub mod render;
pub mod util;
