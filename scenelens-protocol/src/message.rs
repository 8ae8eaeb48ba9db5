//! Wire messages.
//!
//! Every message is a JSON object discriminated by `type`. Inspector-to-target
//! messages are commands, target-to-inspector messages are snapshots and echoes.
//! Nothing is acknowledged.

use crate::node::{ContainerNode, FilterUniform, LayoutMap, Transform};
use crate::value::{PropValue, UniformValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    InspectorToTarget,
    TargetToInspector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Message {
    GetHierarchy,
    SetProperty {
        id: String,
        property: String,
        /// `None` clears a layout style key.
        #[serde(default)]
        value: Option<PropValue>,
    },
    Highlight {
        #[serde(default)]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        show_children: Option<bool>,
    },
    GetLayout {
        id: String,
    },
    SetFilterUniform {
        id: String,
        filter_index: usize,
        group_name: String,
        uniform_name: String,
        value: UniformValue,
    },
    Hierarchy {
        data: Vec<ContainerNode>,
    },
    Updated {
        id: String,
        layout: LayoutMap,
        /// Present only when the mutation toggled layout participation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout_enabled: Option<bool>,
        transform: Transform,
    },
    LayoutConfig {
        id: String,
        config: LayoutMap,
    },
    FilterUpdated {
        id: String,
        filter_index: usize,
        uniforms: Vec<FilterUniform>,
    },
}

impl Message {
    /// The wire discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::GetHierarchy => "get-hierarchy",
            Message::SetProperty { .. } => "set-property",
            Message::Highlight { .. } => "highlight",
            Message::GetLayout { .. } => "get-layout",
            Message::SetFilterUniform { .. } => "set-filter-uniform",
            Message::Hierarchy { .. } => "hierarchy",
            Message::Updated { .. } => "updated",
            Message::LayoutConfig { .. } => "layout-config",
            Message::FilterUpdated { .. } => "filter-updated",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Message::GetHierarchy
            | Message::SetProperty { .. }
            | Message::Highlight { .. }
            | Message::GetLayout { .. }
            | Message::SetFilterUniform { .. } => Direction::InspectorToTarget,
            Message::Hierarchy { .. }
            | Message::Updated { .. }
            | Message::LayoutConfig { .. }
            | Message::FilterUpdated { .. } => Direction::TargetToInspector,
        }
    }

    pub fn is_command(&self) -> bool {
        self.direction() == Direction::InspectorToTarget
    }

    pub fn set_property(id: impl Into<String>, property: impl Into<String>, value: Option<PropValue>) -> Self {
        Message::SetProperty {
            id: id.into(),
            property: property.into(),
            value,
        }
    }

    pub fn highlight(id: Option<&str>, show_children: bool) -> Self {
        Message::Highlight {
            id: id.map(str::to_string),
            show_children: show_children.then_some(true),
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ProtocolError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_hierarchy_is_a_bare_type() {
        let raw = Message::GetHierarchy.encode().unwrap();
        assert_eq!(raw, r#"{"type":"get-hierarchy"}"#);
    }

    #[test]
    fn set_property_uses_camel_case_and_null_for_unset() {
        let msg = Message::set_property("Root", "width", None);
        let value = msg.to_value().unwrap();
        assert_eq!(value, json!({"type": "set-property", "id": "Root", "property": "width", "value": null}));

        let decoded = Message::decode(r#"{"type":"set-property","id":"Root","property":"width","value":"50%"}"#).unwrap();
        assert_eq!(decoded, Message::set_property("Root", "width", Some(PropValue::Text("50%".into()))));
    }

    #[test]
    fn highlight_with_null_id_clears() {
        let decoded = Message::decode(r#"{"type":"highlight","id":null}"#).unwrap();
        assert_eq!(decoded, Message::Highlight { id: None, show_children: None });
        let value = Message::highlight(Some("Panel"), true).to_value().unwrap();
        assert_eq!(value, json!({"type": "highlight", "id": "Panel", "showChildren": true}));
    }

    #[test]
    fn set_filter_uniform_field_names() {
        let raw = json!({
            "type": "set-filter-uniform",
            "id": "Card",
            "filterIndex": 1,
            "groupName": "glowUniforms",
            "uniformName": "uColor",
            "value": [1.0, 0.5, 0.0]
        });
        let decoded: Message = serde_json::from_value(raw).unwrap();
        match decoded {
            Message::SetFilterUniform { filter_index, group_name, value, .. } => {
                assert_eq!(filter_index, 1);
                assert_eq!(group_name, "glowUniforms");
                assert_eq!(value, UniformValue::Vector(vec![1.0, 0.5, 0.0]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn updated_omits_layout_enabled_unless_toggled() {
        let msg = Message::Updated {
            id: "Root".into(),
            layout: LayoutMap::new(),
            layout_enabled: None,
            transform: Transform::default(),
        };
        let value = msg.to_value().unwrap();
        assert!(value.get("layoutEnabled").is_none());
        assert_eq!(msg.direction(), Direction::TargetToInspector);
    }

    #[test]
    fn unknown_type_is_a_codec_error() {
        let err = Message::decode(r#"{"type":"reload"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Codec(_)));
    }

    #[test]
    fn kinds_match_wire_tags() {
        let msg = Message::GetLayout { id: "A".into() };
        assert_eq!(msg.to_value().unwrap()["type"], msg.kind());
        assert!(msg.is_command());
    }
}
