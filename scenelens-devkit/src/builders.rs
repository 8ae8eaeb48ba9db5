/*!
Builders for wire messages and snapshot nodes

Shortcuts for the messages a target sends, so inspector tests can play the
target side without a live scene.
*/

use scenelens_protocol::{
    ContainerNode, FilterInfo, FilterUniform, LayoutMap, Message, PropValue, UniformValue,
};

pub struct MessageBuilder;

impl MessageBuilder {
    pub fn hierarchy(data: Vec<ContainerNode>) -> Message {
        Message::Hierarchy { data }
    }

    /// `updated` echo carrying the node's current layout and transform.
    pub fn updated(node: &ContainerNode) -> Message {
        Message::Updated {
            id: node.id.clone(),
            layout: node.layout.clone(),
            layout_enabled: None,
            transform: node.transform.clone(),
        }
    }

    /// `updated` echo for a layout-participation toggle.
    pub fn layout_toggled(node: &ContainerNode) -> Message {
        Message::Updated {
            id: node.id.clone(),
            layout: node.layout.clone(),
            layout_enabled: Some(node.layout_enabled),
            transform: node.transform.clone(),
        }
    }

    pub fn layout_config(node: &ContainerNode) -> Message {
        Message::LayoutConfig {
            id: node.id.clone(),
            config: node.layout.clone(),
        }
    }

    pub fn filter_updated(id: &str, filter: &FilterInfo) -> Message {
        Message::FilterUpdated {
            id: id.to_string(),
            filter_index: filter.index,
            uniforms: filter.uniforms.clone(),
        }
    }

    pub fn set_property(id: &str, property: &str, value: impl Into<PropValue>) -> Message {
        Message::set_property(id, property, Some(value.into()))
    }

    pub fn clear_property(id: &str, property: &str) -> Message {
        Message::set_property(id, property, None)
    }

    pub fn set_filter_uniform(id: &str, filter_index: usize, group: &str, uniform: &str, value: UniformValue) -> Message {
        Message::SetFilterUniform {
            id: id.to_string(),
            filter_index,
            group_name: group.to_string(),
            uniform_name: uniform.to_string(),
            value,
        }
    }
}

/// Fluent `ContainerNode` construction.
pub struct NodeBuilder {
    node: ContainerNode,
}

impl NodeBuilder {
    pub fn new(id: &str, class_name: &str) -> Self {
        Self {
            node: ContainerNode::new(id, class_name),
        }
    }

    /// Adds a layout value and turns layout participation on.
    pub fn layout(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.node.layout.insert(key.to_string(), value.into());
        self.node.layout_enabled = true;
        self
    }

    pub fn layout_map(mut self, layout: LayoutMap) -> Self {
        self.node.layout_enabled = !layout.is_empty();
        self.node.layout = layout;
        self
    }

    pub fn layout_enabled(mut self, enabled: bool) -> Self {
        self.node.layout_enabled = enabled;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.node.transform.x = x;
        self.node.transform.y = y;
        self
    }

    pub fn anchored(mut self, x: f64, y: f64) -> Self {
        self.node.transform.has_anchor = true;
        self.node.transform.anchor_x = Some(x);
        self.node.transform.anchor_y = Some(y);
        self
    }

    /// Adds a filter with one group of uniforms; the index is its position.
    pub fn filter(mut self, class_name: &str, group: &str, uniforms: Vec<(&str, UniformValue)>) -> Self {
        let filters = self.node.filters.get_or_insert_with(Vec::new);
        filters.push(FilterInfo {
            index: filters.len(),
            class_name: class_name.to_string(),
            uniforms: uniforms
                .into_iter()
                .map(|(name, value)| FilterUniform {
                    name: name.to_string(),
                    uniform_type: value.shape_type(),
                    value,
                    group_name: group.to_string(),
                })
                .collect(),
        });
        self
    }

    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.node.children.push(child.build());
        self
    }

    pub fn build(self) -> ContainerNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelens_protocol::UniformType;

    #[test]
    fn node_builder_nests_and_indexes_filters() {
        let root = NodeBuilder::new("Root", "Container")
            .layout("width", 100)
            .child(
                NodeBuilder::new("Card", "Sprite")
                    .anchored(0.5, 0.5)
                    .filter("BlurFilter", "blurUniforms", vec![("uStrength", UniformValue::Scalar(8.0))])
                    .filter("GlowFilter", "glowUniforms", vec![("uColor", UniformValue::Vector(vec![1.0, 0.0, 0.0]))]),
            )
            .build();
        assert!(root.layout_enabled);
        let card = root.find("Card").unwrap();
        let filters = card.filters.as_ref().unwrap();
        assert_eq!(filters[1].index, 1);
        assert_eq!(filters[1].uniforms[0].uniform_type, UniformType::Vec3);
    }

    #[test]
    fn toggle_echo_carries_flag() {
        let node = NodeBuilder::new("Root", "Container").layout_enabled(false).build();
        match MessageBuilder::layout_toggled(&node) {
            Message::Updated { layout_enabled, .. } => assert_eq!(layout_enabled, Some(false)),
            other => panic!("unexpected {other:?}"),
        }
        match MessageBuilder::updated(&node) {
            Message::Updated { layout_enabled, .. } => assert_eq!(layout_enabled, None),
            other => panic!("unexpected {other:?}"),
        }
    }
}
