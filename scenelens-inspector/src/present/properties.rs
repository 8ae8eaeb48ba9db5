//! Property form: section layout, field kinds and per-field status.

use crate::reconcile::{PropertyStatus, ReconciliationEngine};
use crate::store::KeyValueStore;
use scenelens_protocol::{ContainerNode, PropValue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number { step: f64 },
    Text,
    Select(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionDef {
    pub title: &'static str,
    pub transform: bool,
    pub fields: &'static [FieldDef],
}

const fn number(key: &'static str) -> FieldDef {
    FieldDef {
        key,
        label: key,
        kind: FieldKind::Number { step: 1.0 },
    }
}

const fn fine(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        key,
        label,
        kind: FieldKind::Number { step: 0.1 },
    }
}

const fn text(key: &'static str) -> FieldDef {
    FieldDef {
        key,
        label: key,
        kind: FieldKind::Text,
    }
}

const fn select(key: &'static str, options: &'static [&'static str]) -> FieldDef {
    FieldDef {
        key,
        label: key,
        kind: FieldKind::Select(options),
    }
}

pub const FLEX_DIRECTION: &[&str] = &["row", "column", "row-reverse", "column-reverse"];
pub const FLEX_WRAP: &[&str] = &["nowrap", "wrap", "wrap-reverse"];
pub const JUSTIFY_CONTENT: &[&str] = &[
    "flex-start",
    "flex-end",
    "center",
    "space-between",
    "space-around",
    "space-evenly",
];
pub const ALIGN_ITEMS: &[&str] = &["flex-start", "flex-end", "center", "stretch", "baseline"];
pub const ALIGN_CONTENT: &[&str] = &[
    "flex-start",
    "flex-end",
    "center",
    "stretch",
    "space-between",
    "space-around",
];
pub const ALIGN_SELF: &[&str] = &["auto", "flex-start", "flex-end", "center", "stretch", "baseline"];

pub const SECTIONS: &[SectionDef] = &[
    SectionDef {
        title: "Transform",
        transform: true,
        fields: &[
            number("x"),
            number("y"),
            fine("scaleX", "scale.x"),
            fine("scaleY", "scale.y"),
            fine("rotation", "rotation"),
            number("pivotX"),
            number("pivotY"),
            fine("anchorX", "anchor.x"),
            fine("anchorY", "anchor.y"),
            fine("alpha", "alpha"),
        ],
    },
    SectionDef {
        title: "Size",
        transform: false,
        fields: &[
            text("width"),
            text("height"),
            number("minWidth"),
            number("maxWidth"),
            number("minHeight"),
            number("maxHeight"),
        ],
    },
    SectionDef {
        title: "Flexbox Container",
        transform: false,
        fields: &[
            select("flexDirection", FLEX_DIRECTION),
            select("flexWrap", FLEX_WRAP),
            select("justifyContent", JUSTIFY_CONTENT),
            select("alignItems", ALIGN_ITEMS),
            select("alignContent", ALIGN_CONTENT),
            number("gap"),
            number("rowGap"),
            number("columnGap"),
        ],
    },
    SectionDef {
        title: "Flexbox Item",
        transform: false,
        fields: &[
            number("flex"),
            number("flexGrow"),
            number("flexShrink"),
            number("flexBasis"),
            select("alignSelf", ALIGN_SELF),
        ],
    },
    SectionDef {
        title: "Spacing",
        transform: false,
        fields: &[
            number("padding"),
            number("paddingTop"),
            number("paddingRight"),
            number("paddingBottom"),
            number("paddingLeft"),
            number("margin"),
            number("marginTop"),
            number("marginRight"),
            number("marginBottom"),
            number("marginLeft"),
        ],
    },
];

pub fn field_def(key: &str) -> Option<&'static FieldDef> {
    SECTIONS.iter().flat_map(|s| s.fields.iter()).find(|f| f.key == key)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRow {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: Option<PropValue>,
    pub status: PropertyStatus,
}

impl PropertyRow {
    pub fn value_text(&self) -> String {
        self.value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// "was: X" / "new" hint, empty when unchanged.
    pub fn status_text(&self) -> String {
        match &self.status {
            PropertyStatus::Unchanged => String::new(),
            PropertyStatus::Was(original) => format!("was: {original}"),
            PropertyStatus::New => "new".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySection {
    pub title: &'static str,
    pub rows: Vec<PropertyRow>,
}

/// Form contents for `node`. Anchor rows appear only on nodes with anchor support.
pub fn property_sections<S: KeyValueStore>(
    engine: &ReconciliationEngine<S>,
    node: &ContainerNode,
) -> Vec<PropertySection> {
    SECTIONS
        .iter()
        .map(|section| PropertySection {
            title: section.title,
            rows: section
                .fields
                .iter()
                .filter(|field| node.transform.has_anchor || !field.key.starts_with("anchor"))
                .map(|field| {
                    let value = engine.effective_value(node, field.key);
                    let status = engine.property_status(&node.id, field.key, value.as_ref());
                    PropertyRow {
                        key: field.key,
                        label: field.label,
                        kind: field.kind,
                        value,
                        status,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Converts raw input into a property value. An empty string clears the property.
pub fn parse_input(key: &str, raw: &str) -> Option<PropValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let kind = field_def(key).map(|f| f.kind).unwrap_or(FieldKind::Text);
    match kind {
        FieldKind::Number { .. } => raw.parse::<f64>().ok().map(PropValue::Number),
        FieldKind::Select(_) => Some(PropValue::Text(raw.to_string())),
        // Text fields accept "auto" or "50%" as well as plain numbers.
        FieldKind::Text => Some(
            raw.parse::<f64>()
                .map(PropValue::Number)
                .unwrap_or_else(|_| PropValue::Text(raw.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SessionStore};
    use scenelens_protocol::{LAYOUT_KEYS, TRANSFORM_KEYS};

    #[test]
    fn sections_cover_every_key_once() {
        let keys: Vec<&str> = SECTIONS.iter().flat_map(|s| s.fields.iter().map(|f| f.key)).collect();
        assert_eq!(keys.len(), LAYOUT_KEYS.len() + TRANSFORM_KEYS.len());
        for key in LAYOUT_KEYS.iter().chain(TRANSFORM_KEYS.iter()) {
            assert!(keys.contains(key), "{key} missing");
        }
    }

    #[test]
    fn parse_respects_field_kind() {
        assert_eq!(parse_input("gap", "12.5"), Some(PropValue::Number(12.5)));
        assert_eq!(parse_input("gap", "wide"), None);
        assert_eq!(parse_input("width", "50%"), Some(PropValue::Text("50%".into())));
        assert_eq!(parse_input("width", "120"), Some(PropValue::Number(120.0)));
        assert_eq!(parse_input("flexDirection", "row"), Some(PropValue::Text("row".into())));
        assert_eq!(parse_input("height", "  "), None);
    }

    #[test]
    fn rows_show_status_against_originals() {
        let mut node = ContainerNode::new("Root", "Container");
        node.layout.insert("width".into(), PropValue::Number(100.0));
        node.layout_enabled = true;

        let mut engine = ReconciliationEngine::new(SessionStore::open(MemoryStore::new()));
        engine.capture_originals(std::slice::from_ref(&node));
        engine.record_edit("Root", "width", Some(PropValue::Number(150.0)));
        engine.record_edit("Root", "gap", Some(PropValue::Number(4.0)));

        let sections = property_sections(&engine, &node);
        assert_eq!(sections.len(), 5);
        let transform = &sections[0];
        assert!(transform.rows.iter().all(|r| !r.key.starts_with("anchor")));

        let row = |key: &str| {
            sections
                .iter()
                .flat_map(|s| s.rows.iter())
                .find(|r| r.key == key)
                .unwrap()
                .clone()
        };
        assert_eq!(row("width").status_text(), "was: 100");
        assert_eq!(row("gap").status_text(), "new");
        assert_eq!(row("x").status_text(), "");
        assert_eq!(row("scaleX").label, "scale.x");
    }

    #[test]
    fn anchor_rows_follow_anchor_support() {
        let mut node = ContainerNode::new("Card", "Sprite");
        node.transform.has_anchor = true;
        node.transform.anchor_x = Some(0.5);
        node.transform.anchor_y = Some(0.5);
        let engine = ReconciliationEngine::new(SessionStore::open(MemoryStore::new()));
        let sections = property_sections(&engine, &node);
        let anchor = sections[0].rows.iter().find(|r| r.key == "anchorX").unwrap();
        assert_eq!(anchor.value_text(), "0.5");
        assert_eq!(anchor.label, "anchor.x");
    }
}
