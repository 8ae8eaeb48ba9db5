//! Flattened tree rows with badges and expand state.

use scenelens_protocol::ContainerNode;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub depth: usize,
    pub id: String,
    pub label: String,
    pub class_name: String,
    pub has_children: bool,
    pub expanded: bool,
    pub selected: bool,
    /// Node has recorded session changes.
    pub changed: bool,
    /// Node has layout props and participates in layout.
    pub layout_badge: bool,
    pub filter_count: usize,
}

impl TreeRow {
    pub fn badges(&self) -> String {
        let mut out = String::new();
        if self.changed {
            out.push('●');
        }
        if self.layout_badge {
            out.push_str(" L");
        }
        if self.filter_count > 0 {
            out.push_str(&format!(" S{}", self.filter_count));
        }
        out.trim_start().to_string()
    }
}

#[derive(Debug, Default)]
pub struct TreeState {
    expanded: HashSet<String>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots start expanded.
    pub fn expand_roots(&mut self, roots: &[ContainerNode]) {
        for root in roots {
            self.expanded.insert(root.id.clone());
        }
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
            return true;
        }
        false
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Visible rows in depth-first order, children of collapsed nodes omitted.
    pub fn rows(&self, roots: &[ContainerNode], changed: &BTreeSet<String>, selected: Option<&str>) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for root in roots {
            self.push_rows(root, 0, changed, selected, &mut rows);
        }
        rows
    }

    fn push_rows(
        &self,
        node: &ContainerNode,
        depth: usize,
        changed: &BTreeSet<String>,
        selected: Option<&str>,
        rows: &mut Vec<TreeRow>,
    ) {
        let expanded = self.is_expanded(&node.id);
        rows.push(TreeRow {
            depth,
            id: node.id.clone(),
            label: display_label(node),
            class_name: node.class_name.clone(),
            has_children: !node.children.is_empty(),
            expanded,
            selected: selected == Some(node.id.as_str()),
            changed: changed.contains(&node.id),
            layout_badge: !node.layout.is_empty() && node.layout_enabled,
            filter_count: node.filter_count(),
        });
        if expanded {
            for child in &node.children {
                self.push_rows(child, depth + 1, changed, selected, rows);
            }
        }
    }
}

pub fn display_label(node: &ContainerNode) -> String {
    if node.id.is_empty() {
        format!("[{}]", node.class_name)
    } else {
        node.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelens_protocol::{FilterInfo, PropValue};

    fn tree() -> Vec<ContainerNode> {
        let mut root = ContainerNode::new("Root", "Container");
        root.layout.insert("width".into(), PropValue::Number(100.0));
        root.layout_enabled = true;
        let mut panel = ContainerNode::new("Panel", "Container");
        panel.filters = Some(vec![FilterInfo {
            index: 0,
            class_name: "BlurFilter".into(),
            uniforms: Vec::new(),
        }]);
        panel.children.push(ContainerNode::new("Leaf", "Sprite"));
        root.children.push(panel);
        vec![root]
    }

    #[test]
    fn roots_expand_and_collapsed_children_hide() {
        let tree = tree();
        let mut state = TreeState::new();
        state.expand_roots(&tree);
        let rows = state.rows(&tree, &BTreeSet::new(), None);
        assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["Root", "Panel"]);

        assert!(state.toggle("Panel"));
        let rows = state.rows(&tree, &BTreeSet::new(), Some("Leaf"));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].depth, 2);
        assert!(rows[2].selected);
    }

    #[test]
    fn badges_reflect_node_state() {
        let tree = tree();
        let mut state = TreeState::new();
        state.expand_roots(&tree);
        let changed: BTreeSet<String> = ["Root".to_string()].into();
        let rows = state.rows(&tree, &changed, None);
        assert_eq!(rows[0].badges(), "● L");
        assert_eq!(rows[1].badges(), "S1");
    }
}
