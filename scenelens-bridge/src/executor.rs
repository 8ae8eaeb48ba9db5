//! Command executor: applies inspector commands to the live scene.
//!
//! Every mutation answers with a re-serialized echo. Unknown ids are logged
//! and skipped; nothing here returns an error to the channel.

use crate::overlay::Highlighter;
use crate::scene::{NodeKey, SceneGraph};
use crate::serialize::{extract_layout, find_by_id, serialize_hierarchy, serialize_uniforms};
use scenelens_protocol::keys::is_transform_key;
use scenelens_protocol::{Message, PropValue, UniformValue, LAYOUT_ENABLED_KEY};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct CommandExecutor {
    highlighter: Highlighter,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Dispatches one incoming message and returns the replies to post.
    pub fn handle<G: SceneGraph + ?Sized>(&mut self, scene: &mut G, message: Message) -> Vec<Message> {
        debug!("[bridge] received {}", message.kind());
        let reply = match message {
            Message::GetHierarchy => Some(self.hierarchy(scene)),
            Message::SetProperty { id, property, value } => self.apply_property(scene, &id, &property, value),
            Message::Highlight { id, show_children } => {
                self.highlight(scene, id.as_deref(), show_children.unwrap_or(false));
                None
            }
            Message::GetLayout { id } => self.layout_config(scene, &id),
            Message::SetFilterUniform {
                id,
                filter_index,
                group_name,
                uniform_name,
                value,
            } => self.apply_filter_uniform(scene, &id, filter_index, &group_name, &uniform_name, value),
            other => {
                debug!("[bridge] ignoring {} from another target", other.kind());
                None
            }
        };
        reply.into_iter().collect()
    }

    pub fn hierarchy<G: SceneGraph + ?Sized>(&self, scene: &G) -> Message {
        Message::Hierarchy {
            data: serialize_hierarchy(scene),
        }
    }

    fn resolve<G: SceneGraph + ?Sized>(scene: &G, id: &str) -> Option<NodeKey> {
        let found = find_by_id(scene, id);
        if found.is_none() {
            debug!("[bridge] container not found: {id}");
        }
        found
    }

    /// Sets a transform or layout property, or toggles participation for `_layoutEnabled`.
    pub fn apply_property<G: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut G,
        id: &str,
        property: &str,
        value: Option<PropValue>,
    ) -> Option<Message> {
        if property == LAYOUT_ENABLED_KEY {
            let enabled = value.as_ref().is_some_and(PropValue::is_truthy);
            return self.set_layout_participation(scene, id, enabled);
        }

        let node = Self::resolve(scene, id)?;

        if is_transform_key(property) {
            match value.as_ref().and_then(PropValue::as_f64) {
                Some(number) => {
                    if !scene.set_transform(node, property, number) {
                        debug!("[bridge] {id} does not support {property}");
                    }
                }
                None => {
                    warn!("[bridge] non-numeric value for {id}.{property}: {value:?}");
                    return None;
                }
            }
        } else {
            if !scene.set_layout_style(node, property, value) {
                debug!("[bridge] {id} has no layout, {property} ignored");
                return None;
            }
            scene.invalidate_layout(node);
            self.highlighter.on_layout(node);
        }

        Some(Self::updated(scene, node, id, None))
    }

    /// Opts a node in or out of layout, then forces the parent to re-run layout.
    pub fn set_layout_participation<G: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut G,
        id: &str,
        enabled: bool,
    ) -> Option<Message> {
        let node = Self::resolve(scene, id)?;
        scene.set_layout_enabled(node, enabled);

        if let Some(parent) = scene.parent(node) {
            if scene.layout_style(parent).is_some() {
                scene.invalidate_layout(parent);
                self.highlighter.on_layout(parent);
            }
        }
        self.highlighter.on_layout(node);

        Some(Self::updated(scene, node, id, Some(enabled)))
    }

    fn updated<G: SceneGraph + ?Sized>(scene: &G, node: NodeKey, id: &str, layout_enabled: Option<bool>) -> Message {
        Message::Updated {
            id: id.to_string(),
            layout: extract_layout(scene, node),
            layout_enabled,
            transform: scene.transform(node),
        }
    }

    pub fn apply_filter_uniform<G: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut G,
        id: &str,
        filter_index: usize,
        group_name: &str,
        uniform_name: &str,
        value: UniformValue,
    ) -> Option<Message> {
        let node = Self::resolve(scene, id)?;
        if !scene.set_uniform(node, filter_index, group_name, uniform_name, value) {
            debug!("[bridge] {id}: no uniform {group_name}.{uniform_name} on filter {filter_index}");
            return None;
        }
        let filter = scene.filters(node).get(filter_index)?;
        Some(Message::FilterUpdated {
            id: id.to_string(),
            filter_index,
            uniforms: serialize_uniforms(filter),
        })
    }

    /// Clears existing highlights, then outlines `id` (and its children) if found.
    pub fn highlight<G: SceneGraph + ?Sized>(&mut self, scene: &mut G, id: Option<&str>, show_children: bool) {
        self.highlighter.clear(scene);
        let Some(id) = id else {
            return;
        };
        if let Some(node) = Self::resolve(scene, id) {
            self.highlighter.highlight(scene, node, show_children);
        }
    }

    pub fn layout_config<G: SceneGraph + ?Sized>(&self, scene: &G, id: &str) -> Option<Message> {
        let node = Self::resolve(scene, id)?;
        Some(Message::LayoutConfig {
            id: id.to_string(),
            config: extract_layout(scene, node),
        })
    }

    /// Notifies highlights that the viewport was resized.
    pub fn on_resize(&mut self) {
        self.highlighter.on_resize();
    }

    /// Runs coalesced overlay redraws. Call once per frame.
    pub fn flush_overlays<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> usize {
        self.highlighter.flush(scene)
    }
}
