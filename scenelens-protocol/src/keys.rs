//! Recognized property names.

/// Layout style keys read from and written to a node's layout configuration.
pub const LAYOUT_KEYS: [&str; 29] = [
    // Size
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    // Flex container
    "flexDirection",
    "flexWrap",
    "justifyContent",
    "alignItems",
    "alignContent",
    "gap",
    "rowGap",
    "columnGap",
    // Flex item
    "flex",
    "flexGrow",
    "flexShrink",
    "flexBasis",
    "alignSelf",
    // Spacing
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
];

pub const TRANSFORM_KEYS: [&str; 10] = [
    "x", "y", "scaleX", "scaleY", "rotation", "pivotX", "pivotY", "anchorX", "anchorY", "alpha",
];

/// Synthetic key toggling layout participation instead of a literal property.
pub const LAYOUT_ENABLED_KEY: &str = "_layoutEnabled";

/// Which originals map a property is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Transform,
    Layout,
}

/// Transform membership is tested first; everything else is layout.
pub fn namespace_of(property: &str) -> Namespace {
    if is_transform_key(property) {
        Namespace::Transform
    } else {
        Namespace::Layout
    }
}

pub fn is_transform_key(property: &str) -> bool {
    TRANSFORM_KEYS.contains(&property)
}

pub fn is_layout_key(property: &str) -> bool {
    LAYOUT_KEYS.contains(&property)
}
