//! Tree serializer: live scene to plain `ContainerNode` snapshot.

use crate::scene::{NodeKey, RawUniform, SceneGraph, ShaderFilter};
use scenelens_protocol::{ContainerNode, FilterInfo, FilterUniform, LayoutMap, UniformType, LAYOUT_KEYS};

/// Label carried by every overlay subtree the bridge injects.
pub const OVERLAY_LABEL: &str = "Debug Overlay";

/// Engine-managed uniforms that are never exposed for editing.
pub const INTERNAL_UNIFORMS: [&str; 8] = [
    "uInputSize",
    "uInputPixel",
    "uInputClamp",
    "uOutputFrame",
    "uOutputTexture",
    "uGlobalFrame",
    "uTexture",
    "uTransformMatrix",
];

/// The whole tree as a single-element forest, empty without a root.
pub fn serialize_hierarchy<G: SceneGraph + ?Sized>(scene: &G) -> Vec<ContainerNode> {
    scene.root().map(|root| vec![serialize_node(scene, root)]).unwrap_or_default()
}

pub fn serialize_node<G: SceneGraph + ?Sized>(scene: &G, key: NodeKey) -> ContainerNode {
    let children = scene
        .children(key)
        .iter()
        .filter(|child| !is_injected(scene, **child))
        .map(|child| serialize_node(scene, *child))
        .collect();

    ContainerNode {
        id: node_id(scene, key),
        class_name: scene.class_name(key).to_string(),
        layout: extract_layout(scene, key),
        layout_enabled: scene.layout_style(key).is_some(),
        transform: scene.transform(key),
        filters: extract_filters(scene, key),
        children,
    }
}

/// The node's label, or `[ClassName]` when it has none.
pub fn node_id<G: SceneGraph + ?Sized>(scene: &G, key: NodeKey) -> String {
    match scene.label(key) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => format!("[{}]", scene.class_name(key)),
    }
}

fn is_injected<G: SceneGraph + ?Sized>(scene: &G, key: NodeKey) -> bool {
    scene.is_overlay(key) || scene.label(key) == Some(OVERLAY_LABEL)
}

/// Recognized layout keys present in the node's style; empty when layout is off.
pub fn extract_layout<G: SceneGraph + ?Sized>(scene: &G, key: NodeKey) -> LayoutMap {
    let Some(style) = scene.layout_style(key) else {
        return LayoutMap::new();
    };
    LAYOUT_KEYS
        .iter()
        .filter_map(|k| style.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}

/// Active filters, each keeping its index in the node's full filter list.
pub fn extract_filters<G: SceneGraph + ?Sized>(scene: &G, key: NodeKey) -> Option<Vec<FilterInfo>> {
    let filters = scene.filters(key);
    if filters.is_empty() {
        return None;
    }
    Some(
        filters
            .iter()
            .enumerate()
            .filter(|(_, f)| f.enabled)
            .map(|(index, f)| serialize_filter(index, f))
            .collect(),
    )
}

pub fn serialize_filter(index: usize, filter: &ShaderFilter) -> FilterInfo {
    FilterInfo {
        index,
        class_name: filter.class_name.clone(),
        uniforms: serialize_uniforms(filter),
    }
}

pub fn serialize_uniforms(filter: &ShaderFilter) -> Vec<FilterUniform> {
    filter
        .groups
        .iter()
        .flat_map(|group| {
            group
                .uniforms
                .iter()
                .filter(|u| !INTERNAL_UNIFORMS.contains(&u.name.as_str()))
                .map(|u| FilterUniform {
                    name: u.name.clone(),
                    uniform_type: infer_uniform_type(u),
                    value: u.value.clone(),
                    group_name: group.name.clone(),
                })
        })
        .collect()
}

/// Declared structure wins when it names a known type, else the runtime shape decides.
pub fn infer_uniform_type(uniform: &RawUniform) -> UniformType {
    if let Some(declared) = uniform.declared.as_deref() {
        let parsed = UniformType::parse(declared);
        if parsed != UniformType::Unknown {
            return parsed;
        }
    }
    uniform.value.shape_type()
}

/// First node labelled `id` in depth-first order. Overlays never match.
pub fn find_by_id<G: SceneGraph + ?Sized>(scene: &G, id: &str) -> Option<NodeKey> {
    fn search<G: SceneGraph + ?Sized>(scene: &G, key: NodeKey, id: &str) -> Option<NodeKey> {
        if scene.label(key) == Some(id) && !scene.is_overlay(key) {
            return Some(key);
        }
        scene.children(key).iter().find_map(|child| search(scene, *child, id))
    }
    search(scene, scene.root()?, id)
}
