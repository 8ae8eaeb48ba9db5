//! Change summary listing every recorded delta against its original.

use crate::reconcile::ReconciliationEngine;
use crate::store::KeyValueStore;
use scenelens_protocol::PropValue;
use std::fmt;

const NOT_SET: &str = "(not set)";

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    pub node_id: String,
    pub property: String,
    pub original: Option<PropValue>,
    pub value: Option<PropValue>,
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: {} → {}",
            self.node_id,
            self.property,
            or_not_set(self.original.as_ref()),
            or_not_set(self.value.as_ref())
        )
    }
}

fn or_not_set(value: Option<&PropValue>) -> String {
    value.map_or_else(|| NOT_SET.to_string(), ToString::to_string)
}

pub fn change_summary<S: KeyValueStore>(engine: &ReconciliationEngine<S>) -> Vec<ChangeEntry> {
    engine
        .changes()
        .iter()
        .flat_map(|(node_id, props)| {
            props.iter().map(move |(property, value)| ChangeEntry {
                node_id: node_id.clone(),
                property: property.clone(),
                original: engine.original_value(node_id, property).cloned(),
                value: value.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SessionStore};
    use scenelens_protocol::ContainerNode;

    #[test]
    fn summary_formats_missing_values() {
        let mut root = ContainerNode::new("Root", "Container");
        root.layout.insert("width".into(), PropValue::Number(100.0));
        let mut engine = ReconciliationEngine::new(SessionStore::open(MemoryStore::new()));
        engine.capture_originals(&[root]);
        engine.record_edit("Root", "width", None);
        engine.record_edit("Root", "gap", Some(PropValue::Number(6.0)));

        let lines: Vec<String> = change_summary(&engine).iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["Root.gap: (not set) → 6", "Root.width: 100 → (not set)"]);
    }
}
