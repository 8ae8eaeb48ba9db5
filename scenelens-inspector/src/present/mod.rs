//! View models derived from inspector state. Nothing here talks to the channel.

pub mod changes;
pub mod filters;
pub mod properties;
pub mod tree;

pub use changes::{change_summary, ChangeEntry};
pub use filters::{filter_sections, FilterSection, UniformControl, UniformRow};
pub use properties::{parse_input, property_sections, FieldKind, PropertyRow, PropertySection};
pub use tree::{TreeRow, TreeState};
