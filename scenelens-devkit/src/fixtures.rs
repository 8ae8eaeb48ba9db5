//! Ready-made scenes and snapshots for tests.

use crate::builders::NodeBuilder;
use scenelens_bridge::serialize::serialize_hierarchy;
use scenelens_bridge::Scene;
use scenelens_protocol::ContainerNode;

pub use scenelens_bridge::demo::demo_scene;

/// Snapshot of the demo scene exactly as the bridge would broadcast it.
pub fn snapshot() -> Vec<ContainerNode> {
    let scene: Scene = demo_scene();
    serialize_hierarchy(&scene)
}

/// A single layout-enabled `Root` container with only `width` set.
pub fn root_with_width(width: f64) -> ContainerNode {
    NodeBuilder::new("Root", "Container").layout("width", width).build()
}

/// Two nodes sharing the id `Twin`, with different widths.
pub fn duplicate_ids() -> Vec<ContainerNode> {
    vec![NodeBuilder::new("Root", "Container")
        .child(NodeBuilder::new("Twin", "Container").layout("width", 10))
        .child(NodeBuilder::new("Twin", "Container").layout("width", 20))
        .build()]
}
