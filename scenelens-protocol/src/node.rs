//! Serialized scene snapshot.
//!
//! A `ContainerNode` tree is a complete, self-contained copy of the live scene
//! at broadcast time. Ids are developer labels and are not unique: every lookup
//! resolves to the first match in depth-first order.

use crate::keys::LAYOUT_ENABLED_KEY;
use crate::value::{PropValue, UniformType, UniformValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property name to value, ordered for stable output.
pub type PropMap = BTreeMap<String, PropValue>;

/// Layout style values keyed by layout property name.
pub type LayoutMap = PropMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerNode {
    pub id: String,
    #[serde(rename = "type")]
    pub class_name: String,
    #[serde(default)]
    pub layout: LayoutMap,
    #[serde(default)]
    pub layout_enabled: bool,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterInfo>>,
    #[serde(default)]
    pub children: Vec<ContainerNode>,
}

impl ContainerNode {
    pub fn new(id: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            layout: LayoutMap::new(),
            layout_enabled: false,
            transform: Transform::default(),
            filters: None,
            children: Vec::new(),
        }
    }

    /// First node with `id` in depth-first pre-order, including `self`.
    pub fn find(&self, id: &str) -> Option<&ContainerNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ContainerNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Depth-first pre-order walk.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ContainerNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Current live value of a layout or transform property.
    ///
    /// `_layoutEnabled` resolves to the participation flag.
    pub fn live_value(&self, property: &str) -> Option<PropValue> {
        if property == LAYOUT_ENABLED_KEY {
            return Some(PropValue::Bool(self.layout_enabled));
        }
        self.transform
            .get(property)
            .or_else(|| self.layout.get(property).cloned())
    }

    pub fn filter_count(&self) -> usize {
        self.filters.as_ref().map_or(0, Vec::len)
    }
}

/// First match across a forest, in order.
pub fn find_node<'a>(roots: &'a [ContainerNode], id: &str) -> Option<&'a ContainerNode> {
    roots.iter().find_map(|root| root.find(id))
}

pub fn find_node_mut<'a>(roots: &'a mut [ContainerNode], id: &str) -> Option<&'a mut ContainerNode> {
    roots.iter_mut().find_map(|root| root.find_mut(id))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub pivot_x: f64,
    pub pivot_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_y: Option<f64>,
    pub alpha: f64,
    #[serde(default)]
    pub has_anchor: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            anchor_x: None,
            anchor_y: None,
            alpha: 1.0,
            has_anchor: false,
        }
    }
}

impl Transform {
    /// Reads a transform property by wire name. Anchors are `None` when unsupported.
    pub fn get(&self, property: &str) -> Option<PropValue> {
        let value = match property {
            "x" => self.x,
            "y" => self.y,
            "scaleX" => self.scale_x,
            "scaleY" => self.scale_y,
            "rotation" => self.rotation,
            "pivotX" => self.pivot_x,
            "pivotY" => self.pivot_y,
            "alpha" => self.alpha,
            "anchorX" => self.anchor_x?,
            "anchorY" => self.anchor_y?,
            _ => return None,
        };
        Some(PropValue::Number(value))
    }

    /// Writes a numeric transform property. Returns false for unknown names,
    /// anchors on nodes without anchor support, and non-numeric values.
    pub fn set(&mut self, property: &str, value: f64) -> bool {
        let slot = match property {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "scaleX" => &mut self.scale_x,
            "scaleY" => &mut self.scale_y,
            "rotation" => &mut self.rotation,
            "pivotX" => &mut self.pivot_x,
            "pivotY" => &mut self.pivot_y,
            "alpha" => &mut self.alpha,
            "anchorX" if self.has_anchor => self.anchor_x.get_or_insert(0.0),
            "anchorY" if self.has_anchor => self.anchor_y.get_or_insert(0.0),
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Value copy of every present transform property.
    pub fn to_map(&self) -> PropMap {
        crate::keys::TRANSFORM_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|v| (key.to_string(), v)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInfo {
    /// Position in the node's full filter list, inactive filters included.
    pub index: usize,
    pub class_name: String,
    pub uniforms: Vec<FilterUniform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUniform {
    pub name: String,
    #[serde(rename = "type")]
    pub uniform_type: UniformType,
    pub value: UniformValue,
    pub group_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ContainerNode {
        let mut root = ContainerNode::new("Root", "Container");
        let mut panel = ContainerNode::new("Panel", "Container");
        panel.children.push(ContainerNode::new("Button", "Sprite"));
        root.children.push(panel);
        let mut dup = ContainerNode::new("Button", "Container");
        dup.transform.x = 42.0;
        root.children.push(dup);
        root
    }

    #[test]
    fn find_returns_first_depth_first_match() {
        let root = tree();
        let found = root.find("Button").unwrap();
        assert_eq!(found.class_name, "Sprite");
        assert!(root.find("Missing").is_none());
    }

    #[test]
    fn find_node_searches_forest_in_order() {
        let roots = vec![ContainerNode::new("A", "Container"), tree()];
        assert_eq!(find_node(&roots, "Panel").unwrap().id, "Panel");
    }

    #[test]
    fn serializes_with_wire_names() {
        let mut node = ContainerNode::new("Root", "Container");
        node.layout.insert("width".into(), PropValue::Number(100.0));
        node.layout_enabled = true;
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Container");
        assert_eq!(json["layoutEnabled"], true);
        assert_eq!(json["layout"]["width"], 100.0);
        assert_eq!(json["transform"]["scaleX"], 1.0);
        assert_eq!(json["transform"]["hasAnchor"], false);
        assert!(json["transform"].get("anchorX").is_none());
        assert!(json.get("filters").is_none());
    }

    #[test]
    fn transform_anchor_requires_capability() {
        let mut t = Transform::default();
        assert!(!t.set("anchorX", 0.5));
        assert_eq!(t.get("anchorX"), None);
        t.has_anchor = true;
        assert!(t.set("anchorX", 0.5));
        assert_eq!(t.get("anchorX"), Some(PropValue::Number(0.5)));
        assert!(!t.set("width", 10.0));
    }

    #[test]
    fn transform_map_skips_absent_anchors() {
        let map = Transform::default().to_map();
        assert_eq!(map.len(), 8);
        assert_eq!(map.get("scaleY"), Some(&PropValue::Number(1.0)));
    }

    #[test]
    fn live_value_covers_both_namespaces() {
        let mut node = ContainerNode::new("Root", "Container");
        node.layout.insert("gap".into(), PropValue::Number(8.0));
        node.transform.x = 3.0;
        assert_eq!(node.live_value("gap"), Some(PropValue::Number(8.0)));
        assert_eq!(node.live_value("x"), Some(PropValue::Number(3.0)));
        assert_eq!(node.live_value("_layoutEnabled"), Some(PropValue::Bool(false)));
        assert_eq!(node.live_value("width"), None);
    }
}
