/**
 * SCENE - introspection contract over the host scene graph
 *
 * ROLE: `SceneGraph` is the single interface the serializer and executor use to
 * read and mutate live nodes. Hosts implement it over their own object model.
 *
 * `Scene` is an arena-backed implementation used by the demo target and tests.
 */

use crate::overlay::OverlayStyle;
use scenelens_protocol::{LayoutMap, PropValue, Transform, UniformValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// One uniform as the engine exposes it: a declared type when the shader
/// resource carries one, and its current runtime value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUniform {
    pub name: String,
    pub declared: Option<String>,
    pub value: UniformValue,
}

impl RawUniform {
    pub fn new(name: &str, value: UniformValue) -> Self {
        Self { name: name.to_string(), declared: None, value }
    }

    pub fn declared(mut self, declared: &str) -> Self {
        self.declared = Some(declared.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformGroup {
    pub name: String,
    pub uniforms: Vec<RawUniform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderFilter {
    pub class_name: String,
    pub enabled: bool,
    pub groups: Vec<UniformGroup>,
}

impl ShaderFilter {
    pub fn new(class_name: &str) -> Self {
        Self { class_name: class_name.to_string(), enabled: true, groups: Vec::new() }
    }

    pub fn group(mut self, name: &str, uniforms: Vec<RawUniform>) -> Self {
        self.groups.push(UniformGroup { name: name.to_string(), uniforms });
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn uniform_mut(&mut self, group: &str, name: &str) -> Option<&mut RawUniform> {
        self.groups
            .iter_mut()
            .find(|g| g.name == group)?
            .uniforms
            .iter_mut()
            .find(|u| u.name == name)
    }
}

pub trait SceneGraph {
    fn root(&self) -> Option<NodeKey>;
    fn children(&self, node: NodeKey) -> &[NodeKey];
    fn parent(&self, node: NodeKey) -> Option<NodeKey>;
    fn label(&self, node: NodeKey) -> Option<&str>;
    fn class_name(&self, node: NodeKey) -> &str;

    fn transform(&self, node: NodeKey) -> Transform;
    /// Writes one numeric transform property. False when the node does not support it.
    fn set_transform(&mut self, node: NodeKey, property: &str, value: f64) -> bool;

    /// `None` when the node has no layout configuration (layout disabled).
    fn layout_style(&self, node: NodeKey) -> Option<&LayoutMap>;
    /// Sets (`Some`) or deletes (`None`) one style key. False when the node has no layout.
    fn set_layout_style(&mut self, node: NodeKey, property: &str, value: Option<PropValue>) -> bool;
    fn set_layout_enabled(&mut self, node: NodeKey, enabled: bool);
    /// Forces the layout of `node` and its subtree to be recomputed.
    fn invalidate_layout(&mut self, node: NodeKey);

    fn filters(&self, node: NodeKey) -> &[ShaderFilter];
    fn set_uniform(&mut self, node: NodeKey, filter_index: usize, group: &str, name: &str, value: UniformValue) -> bool;

    /// Injects a highlight overlay as the first child of `node`.
    fn attach_overlay(&mut self, node: NodeKey, style: OverlayStyle) -> NodeKey;
    fn detach_overlay(&mut self, overlay: NodeKey);
    fn is_overlay(&self, node: NodeKey) -> bool;
    /// Computed layout size when non-zero, else local bounds.
    fn overlay_extent(&self, node: NodeKey) -> Bounds;
    fn draw_overlay(&mut self, overlay: NodeKey, rect: Bounds);
}

/// Builder for arena nodes.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    label: Option<String>,
    class_name: String,
    transform: Transform,
    layout: Option<LayoutMap>,
    filters: Vec<ShaderFilter>,
    bounds: Bounds,
    computed: Bounds,
}

impl NodeSpec {
    pub fn new(class_name: &str) -> Self {
        Self {
            label: None,
            class_name: class_name.to_string(),
            transform: Transform::default(),
            layout: None,
            filters: Vec::new(),
            bounds: Bounds::default(),
            computed: Bounds::default(),
        }
    }

    pub fn labeled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.transform.x = x;
        self.transform.y = y;
        self
    }

    pub fn anchored(mut self, x: f64, y: f64) -> Self {
        self.transform.has_anchor = true;
        self.transform.anchor_x = Some(x);
        self.transform.anchor_y = Some(y);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.transform.alpha = alpha;
        self
    }

    /// Opts into layout with an empty style.
    pub fn with_layout(mut self) -> Self {
        self.layout.get_or_insert_with(LayoutMap::new);
        self
    }

    pub fn style(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.layout.get_or_insert_with(LayoutMap::new).insert(key.to_string(), value.into());
        self
    }

    pub fn filter(mut self, filter: ShaderFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds = Bounds::new(0.0, 0.0, width, height);
        self
    }

    pub fn computed(mut self, width: f64, height: f64) -> Self {
        self.computed = Bounds::new(0.0, 0.0, width, height);
        self
    }
}

#[derive(Debug)]
struct SceneNode {
    label: Option<String>,
    class_name: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    transform: Transform,
    layout: Option<LayoutMap>,
    filters: Vec<ShaderFilter>,
    bounds: Bounds,
    computed: Bounds,
    overlay: Option<OverlayDrawing>,
    layout_passes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDrawing {
    pub style: OverlayStyle,
    pub rect: Option<Bounds>,
}

/// Arena scene graph. Keys stay valid until the node is removed.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    root: Option<NodeKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, spec: NodeSpec) -> NodeKey {
        let key = self.insert(spec, None);
        self.root = Some(key);
        key
    }

    pub fn add_child(&mut self, parent: NodeKey, spec: NodeSpec) -> NodeKey {
        let key = self.insert(spec, Some(parent));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(key);
        }
        key
    }

    fn insert(&mut self, spec: NodeSpec, parent: Option<NodeKey>) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        self.nodes.push(Some(SceneNode {
            label: spec.label,
            class_name: spec.class_name,
            parent,
            children: Vec::new(),
            transform: spec.transform,
            layout: spec.layout,
            filters: spec.filters,
            bounds: spec.bounds,
            computed: spec.computed,
            overlay: None,
            layout_passes: 0,
        }));
        key
    }

    fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.node(key).is_some()
    }

    /// Number of forced layout passes on `key`.
    pub fn layout_passes(&self, key: NodeKey) -> u32 {
        self.node(key).map_or(0, |n| n.layout_passes)
    }

    pub fn overlay(&self, key: NodeKey) -> Option<&OverlayDrawing> {
        self.node(key)?.overlay.as_ref()
    }

    /// Overlays currently attached anywhere in the scene.
    pub fn overlays(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_ref().is_some_and(|n| n.overlay.is_some()))
            .map(|(i, _)| NodeKey(i))
            .collect()
    }

    pub fn set_computed(&mut self, key: NodeKey, width: f64, height: f64) {
        if let Some(n) = self.node_mut(key) {
            n.computed = Bounds::new(0.0, 0.0, width, height);
        }
    }

    pub fn set_bounds(&mut self, key: NodeKey, width: f64, height: f64) {
        if let Some(n) = self.node_mut(key) {
            n.bounds = Bounds::new(0.0, 0.0, width, height);
        }
    }
}

impl SceneGraph for Scene {
    fn root(&self) -> Option<NodeKey> {
        self.root
    }

    fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.node(node)?.parent
    }

    fn label(&self, node: NodeKey) -> Option<&str> {
        self.node(node)?.label.as_deref()
    }

    fn class_name(&self, node: NodeKey) -> &str {
        self.node(node).map_or("", |n| n.class_name.as_str())
    }

    fn transform(&self, node: NodeKey) -> Transform {
        self.node(node).map(|n| n.transform.clone()).unwrap_or_default()
    }

    fn set_transform(&mut self, node: NodeKey, property: &str, value: f64) -> bool {
        self.node_mut(node).is_some_and(|n| n.transform.set(property, value))
    }

    fn layout_style(&self, node: NodeKey) -> Option<&LayoutMap> {
        self.node(node)?.layout.as_ref()
    }

    fn set_layout_style(&mut self, node: NodeKey, property: &str, value: Option<PropValue>) -> bool {
        let Some(style) = self.node_mut(node).and_then(|n| n.layout.as_mut()) else {
            return false;
        };
        match value {
            Some(v) => {
                style.insert(property.to_string(), v);
            }
            None => {
                style.remove(property);
            }
        }
        true
    }

    fn set_layout_enabled(&mut self, node: NodeKey, enabled: bool) {
        if let Some(n) = self.node_mut(node) {
            // Re-enabling opts in with intrinsic sizing, the previous style is gone.
            n.layout = enabled.then(LayoutMap::new);
        }
    }

    fn invalidate_layout(&mut self, node: NodeKey) {
        if let Some(n) = self.node_mut(node) {
            n.layout_passes += 1;
        }
    }

    fn filters(&self, node: NodeKey) -> &[ShaderFilter] {
        self.node(node).map(|n| n.filters.as_slice()).unwrap_or(&[])
    }

    fn set_uniform(&mut self, node: NodeKey, filter_index: usize, group: &str, name: &str, value: UniformValue) -> bool {
        let Some(uniform) = self
            .node_mut(node)
            .and_then(|n| n.filters.get_mut(filter_index))
            .and_then(|f| f.uniform_mut(group, name))
        else {
            return false;
        };
        uniform.value = value;
        true
    }

    fn attach_overlay(&mut self, node: NodeKey, style: OverlayStyle) -> NodeKey {
        let spec = NodeSpec::new("Container").labeled(crate::serialize::OVERLAY_LABEL);
        let key = self.insert(spec, Some(node));
        if let Some(n) = self.node_mut(key) {
            n.overlay = Some(OverlayDrawing { style, rect: None });
        }
        if let Some(p) = self.node_mut(node) {
            p.children.insert(0, key);
        }
        key
    }

    fn detach_overlay(&mut self, overlay: NodeKey) {
        let Some(parent) = self.node(overlay).and_then(|n| n.overlay.as_ref().and(n.parent)) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != overlay);
        }
        self.nodes[overlay.0] = None;
    }

    fn is_overlay(&self, node: NodeKey) -> bool {
        self.node(node).is_some_and(|n| n.overlay.is_some())
    }

    fn overlay_extent(&self, node: NodeKey) -> Bounds {
        let Some(n) = self.node(node) else {
            return Bounds::default();
        };
        if n.computed.width > 0.0 || n.computed.height > 0.0 {
            n.computed
        } else {
            n.bounds
        }
    }

    fn draw_overlay(&mut self, overlay: NodeKey, rect: Bounds) {
        if let Some(drawing) = self.node_mut(overlay).and_then(|n| n.overlay.as_mut()) {
            drawing.rect = Some(rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_parent_child_links() {
        let mut scene = Scene::new();
        let root = scene.set_root(NodeSpec::new("Container").labeled("Root"));
        let child = scene.add_child(root, NodeSpec::new("Sprite"));
        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.parent(child), Some(root));
        assert_eq!(scene.label(child), None);
        assert_eq!(scene.class_name(child), "Sprite");
    }

    #[test]
    fn layout_style_requires_layout() {
        let mut scene = Scene::new();
        let root = scene.set_root(NodeSpec::new("Container"));
        assert!(!scene.set_layout_style(root, "width", Some(100.into())));
        scene.set_layout_enabled(root, true);
        assert!(scene.set_layout_style(root, "width", Some(100.into())));
        assert_eq!(scene.layout_style(root).unwrap().get("width"), Some(&PropValue::Number(100.0)));
        assert!(scene.set_layout_style(root, "width", None));
        assert!(scene.layout_style(root).unwrap().is_empty());
        scene.set_layout_enabled(root, false);
        assert!(scene.layout_style(root).is_none());
    }

    #[test]
    fn overlays_attach_and_detach() {
        let mut scene = Scene::new();
        let root = scene.set_root(NodeSpec::new("Container"));
        let child = scene.add_child(root, NodeSpec::new("Sprite"));
        let overlay = scene.attach_overlay(root, OverlayStyle::highlight("Root"));
        assert!(scene.is_overlay(overlay));
        assert_eq!(scene.children(root), &[overlay, child]);
        scene.detach_overlay(overlay);
        assert_eq!(scene.children(root), &[child]);
        assert!(!scene.contains(overlay));
    }

    #[test]
    fn detach_ignores_regular_nodes() {
        let mut scene = Scene::new();
        let root = scene.set_root(NodeSpec::new("Container"));
        let child = scene.add_child(root, NodeSpec::new("Container"));
        scene.detach_overlay(child);
        assert!(scene.contains(child));
    }

    #[test]
    fn overlay_extent_prefers_computed_layout() {
        let mut scene = Scene::new();
        let root = scene.set_root(NodeSpec::new("Container").bounds(40.0, 20.0));
        assert_eq!(scene.overlay_extent(root), Bounds::new(0.0, 0.0, 40.0, 20.0));
        scene.set_computed(root, 300.0, 200.0);
        assert_eq!(scene.overlay_extent(root), Bounds::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn set_uniform_by_index_group_and_name() {
        let mut scene = Scene::new();
        let filter = ShaderFilter::new("GlowFilter")
            .group("glowUniforms", vec![RawUniform::new("uStrength", UniformValue::Scalar(2.0))]);
        let root = scene.set_root(NodeSpec::new("Container").filter(filter));
        assert!(scene.set_uniform(root, 0, "glowUniforms", "uStrength", UniformValue::Scalar(4.0)));
        assert!(!scene.set_uniform(root, 1, "glowUniforms", "uStrength", UniformValue::Scalar(4.0)));
        assert!(!scene.set_uniform(root, 0, "other", "uStrength", UniformValue::Scalar(4.0)));
        assert_eq!(scene.filters(root)[0].groups[0].uniforms[0].value, UniformValue::Scalar(4.0));
    }
}
