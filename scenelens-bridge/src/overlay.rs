//! Highlight overlays and their coalesced redraw queue.

use crate::scene::{NodeKey, SceneGraph};
use crate::serialize::node_id;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugColor {
    pub fill: u32,
    pub border: u32,
}

impl DebugColor {
    const fn solid(rgb: u32) -> Self {
        Self { fill: rgb, border: rgb }
    }
}

pub const RED: DebugColor = DebugColor::solid(0xff0000);
pub const GREEN: DebugColor = DebugColor::solid(0x00ff00);
pub const BLUE: DebugColor = DebugColor::solid(0x0000ff);
pub const YELLOW: DebugColor = DebugColor::solid(0xffff00);
pub const CYAN: DebugColor = DebugColor::solid(0x00ffff);
pub const MAGENTA: DebugColor = DebugColor::solid(0xff00ff);
pub const ORANGE: DebugColor = DebugColor::solid(0xff8800);
pub const PURPLE: DebugColor = DebugColor::solid(0x8800ff);

/// Child outlines cycle through these in order.
pub const CHILD_PALETTE: [DebugColor; 7] = [MAGENTA, YELLOW, GREEN, ORANGE, PURPLE, RED, BLUE];

pub const HIGHLIGHT_FILL_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub color: DebugColor,
    pub fill_alpha: f64,
    pub border_width: f64,
    pub label: String,
}

impl OverlayStyle {
    pub fn new(color: DebugColor, label: &str) -> Self {
        Self {
            color,
            fill_alpha: HIGHLIGHT_FILL_ALPHA,
            border_width: 2.0,
            label: label.to_string(),
        }
    }

    /// Style of the selected node's outline.
    pub fn highlight(label: &str) -> Self {
        Self::new(CYAN, label)
    }

    pub fn child(index: usize, label: &str) -> Self {
        Self::new(CHILD_PALETTE[index % CHILD_PALETTE.len()], label)
    }
}

/// Redraws are deferred and coalesced: an overlay is queued at most once
/// until the next `flush`.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: HashSet<NodeKey>,
    queue: VecDeque<(NodeKey, NodeKey)>,
}

impl RedrawScheduler {
    /// Queues a redraw of `overlay` sized from `target`. Returns false when
    /// one is already pending.
    pub fn schedule(&mut self, overlay: NodeKey, target: NodeKey) -> bool {
        if !self.pending.insert(overlay) {
            return false;
        }
        self.queue.push_back((overlay, target));
        true
    }

    pub fn is_pending(&self, overlay: NodeKey) -> bool {
        self.pending.contains(&overlay)
    }

    pub fn cancel(&mut self, overlay: NodeKey) {
        if self.pending.remove(&overlay) {
            self.queue.retain(|(o, _)| *o != overlay);
        }
    }

    /// Runs every pending redraw. Overlays detached since scheduling are skipped.
    pub fn flush<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> usize {
        let mut drawn = 0;
        while let Some((overlay, target)) = self.queue.pop_front() {
            self.pending.remove(&overlay);
            if !scene.is_overlay(overlay) {
                continue;
            }
            let rect = scene.overlay_extent(target);
            scene.draw_overlay(overlay, rect);
            drawn += 1;
        }
        drawn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveOverlay {
    pub overlay: NodeKey,
    pub target: NodeKey,
}

/// Owns the overlays currently injected for highlighting.
#[derive(Debug, Default)]
pub struct Highlighter {
    active: Vec<ActiveOverlay>,
    redraw: RedrawScheduler,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[ActiveOverlay] {
        &self.active
    }

    pub fn clear<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) {
        for ActiveOverlay { overlay, .. } in self.active.drain(..) {
            self.redraw.cancel(overlay);
            scene.detach_overlay(overlay);
        }
    }

    /// Replaces any existing highlight with one on `target`, plus one per
    /// direct child when `show_children` is set.
    pub fn highlight<G: SceneGraph + ?Sized>(&mut self, scene: &mut G, target: NodeKey, show_children: bool) {
        self.clear(scene);

        let label = node_id(scene, target);
        let children: Vec<NodeKey> = scene
            .children(target)
            .iter()
            .copied()
            .filter(|c| !scene.is_overlay(*c))
            .collect();
        debug!("[bridge] highlighting {label}, show_children: {show_children}, children: {}", children.len());

        self.attach(scene, target, OverlayStyle::highlight(&label));
        if show_children {
            for (index, child) in children.into_iter().enumerate() {
                let child_label = node_id(scene, child);
                self.attach(scene, child, OverlayStyle::child(index, &child_label));
            }
        }
    }

    fn attach<G: SceneGraph + ?Sized>(&mut self, scene: &mut G, target: NodeKey, style: OverlayStyle) {
        let overlay = scene.attach_overlay(target, style);
        self.active.push(ActiveOverlay { overlay, target });
        self.redraw.schedule(overlay, target);
    }

    /// A highlighted node's layout changed.
    pub fn on_layout(&mut self, target: NodeKey) {
        for active in self.active.iter().filter(|a| a.target == target) {
            self.redraw.schedule(active.overlay, active.target);
        }
    }

    /// The viewport changed size: every overlay needs redrawing.
    pub fn on_resize(&mut self) {
        for active in &self.active {
            self.redraw.schedule(active.overlay, active.target);
        }
    }

    pub fn flush<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> usize {
        self.redraw.flush(scene)
    }

    pub fn has_pending_redraws(&self) -> bool {
        !self.redraw.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Bounds, NodeSpec, Scene};

    fn scene_with_children() -> (Scene, NodeKey) {
        let mut scene = Scene::new();
        let root = scene.set_root(NodeSpec::new("Container").labeled("Root").bounds(100.0, 50.0));
        for i in 0..8 {
            scene.add_child(root, NodeSpec::new("Sprite").labeled(&format!("Item{i}")));
        }
        (scene, root)
    }

    #[test]
    fn child_palette_wraps_after_seven() {
        assert_eq!(OverlayStyle::child(0, "a").color, MAGENTA);
        assert_eq!(OverlayStyle::child(6, "a").color, BLUE);
        assert_eq!(OverlayStyle::child(7, "a").color, MAGENTA);
        assert_eq!(OverlayStyle::highlight("a").color, CYAN);
        assert_eq!(OverlayStyle::highlight("a").fill_alpha, 0.3);
    }

    #[test]
    fn redraws_are_coalesced() {
        let (mut scene, root) = scene_with_children();
        let mut highlighter = Highlighter::new();
        highlighter.highlight(&mut scene, root, false);
        highlighter.on_layout(root);
        highlighter.on_layout(root);
        highlighter.on_resize();
        assert_eq!(highlighter.flush(&mut scene), 1);
        assert!(!highlighter.has_pending_redraws());

        let overlay = highlighter.active()[0].overlay;
        let drawing = scene.overlay(overlay).unwrap();
        assert_eq!(drawing.rect, Some(Bounds::new(0.0, 0.0, 100.0, 50.0)));
        assert_eq!(drawing.style.label, "Root");
    }

    #[test]
    fn show_children_outlines_each_direct_child() {
        let (mut scene, root) = scene_with_children();
        let mut highlighter = Highlighter::new();
        highlighter.highlight(&mut scene, root, true);
        assert_eq!(highlighter.active().len(), 9);
        let last = highlighter.active()[8].overlay;
        assert_eq!(scene.overlay(last).unwrap().style.color, MAGENTA);
        assert_eq!(highlighter.flush(&mut scene), 9);
    }

    #[test]
    fn new_highlight_replaces_the_previous_one() {
        let (mut scene, root) = scene_with_children();
        let mut highlighter = Highlighter::new();
        highlighter.highlight(&mut scene, root, true);
        let child = scene.children(root)[1];
        highlighter.highlight(&mut scene, child, true);
        assert_eq!(highlighter.active().len(), 1);
        assert_eq!(scene.overlays().len(), 1);
        // Repeating the highlight does not stack overlays.
        highlighter.highlight(&mut scene, child, true);
        assert_eq!(highlighter.active().len(), 1);
    }

    #[test]
    fn cleared_overlays_are_not_drawn() {
        let (mut scene, root) = scene_with_children();
        let mut highlighter = Highlighter::new();
        highlighter.highlight(&mut scene, root, false);
        highlighter.clear(&mut scene);
        assert_eq!(highlighter.flush(&mut scene), 0);
        assert!(scene.overlays().is_empty());
    }
}
