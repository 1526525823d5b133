//! Test support: one-time logging setup and sample forests.

use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Hierarchical, Identifiable};
use crate::record::RecordNode;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["rstest"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Linked forest:
///
/// ```text
/// 1
/// ├── 11
/// └── 12
///     ├── 121
///     └── 122
/// 2
/// ├── 21
/// └── 22
/// 3
/// ```
///
/// Parent ids are left at 0.
pub fn sample_forest() -> Vec<RecordNode> {
    let leaf = |id| RecordNode::new(id, 0);
    vec![
        leaf(1).with_children(vec![
            leaf(11),
            leaf(12).with_children(vec![leaf(121), leaf(122)]),
        ]),
        leaf(2).with_children(vec![leaf(21), leaf(22)]),
        leaf(3),
    ]
}

/// The same hierarchy as [`sample_forest`], as unlinked records with parent ids.
pub fn sample_records() -> Vec<RecordNode> {
    [
        (1, 0),
        (2, 0),
        (3, 0),
        (11, 1),
        (12, 1),
        (21, 2),
        (22, 2),
        (121, 12),
        (122, 12),
    ]
    .into_iter()
    .map(|(id, parent_id)| RecordNode::new(id, parent_id))
    .collect()
}

/// `sample_records` as the JSON the CLI reads.
pub const SAMPLE_RECORDS_JSON: &str = r#"[
  {"id": 1, "name": "electronics"},
  {"id": 2, "name": "books"},
  {"id": 3, "name": "garden"},
  {"id": 11, "parent_id": 1, "name": "phones"},
  {"id": 12, "parent_id": 1, "name": "laptops"},
  {"id": 21, "parent_id": 2, "name": "fiction"},
  {"id": 22, "parent_id": 2, "name": "poetry"},
  {"id": 121, "parent_id": 12, "name": "ultrabooks"},
  {"id": 122, "parent_id": 12, "name": "workstations"}
]"#;

pub fn ids<N: Identifiable>(nodes: &[N]) -> Vec<N::Id> {
    nodes.iter().map(Identifiable::id).collect()
}

pub fn child_ids<N: Hierarchical>(node: &N) -> Vec<N::Id> {
    ids(&node.children())
}
