/**
 * INSPECTOR - explicit context object for one inspector session
 *
 * ROLE: Ties the channel lifecycle, the reconciliation engine and the latest
 * scene snapshot together. Front ends call the intent methods (select, edit,
 * reset, sessions) and feed every inbound message to `handle_message`.
 *
 * LIFECYCLE: `start` opens a transport and requests the hierarchy, `stop`
 * closes it and forgets the originals. Originals are captured from the first
 * hierarchy after each `start`, never from later snapshots.
 */

use crate::config::InspectorConfig;
use crate::connection::{Connection, ConnectionState};
use crate::reconcile::{EditOutcome, LoadOutcome, PropertyPush, ReconciliationEngine, SaveOutcome};
use crate::store::{KeyValueStore, SessionStore, StoreError};
use scenelens_protocol::{
    find_node, find_node_mut, namespace_of, ContainerNode, Message, Namespace, PropValue, Transport, TransportError,
    UniformValue, LAYOUT_ENABLED_KEY,
};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("not connected to a target")]
    NotConnected,
    #[error("no node selected")]
    NoSelection,
    #[error("no active session")]
    NoActiveSession,
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error("session name must not be empty")]
    EmptySessionName,
    #[error("{0} takes a number")]
    NotNumeric(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a front end should redraw after a message.
///
/// `Values` means field values changed but the form layout did not, so a
/// field the user is typing in should be left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Nothing,
    Values,
    Tree,
    LayoutReady,
}

/// What to do with unsaved edits when switching sessions with autosave off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPolicy {
    SaveFirst,
    Discard,
}

/// Layout config received for copying, pretty-printed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutExport {
    pub id: String,
    pub json: String,
}

pub struct Inspector<T, S> {
    connection: Connection<T>,
    engine: ReconciliationEngine<S>,
    hierarchy: Vec<ContainerNode>,
    selected: Option<String>,
    autosave: bool,
    layout_export: Option<LayoutExport>,
    reapplied: Option<(String, LoadOutcome)>,
}

impl<T: Transport, S: KeyValueStore> Inspector<T, S> {
    pub fn new(store: SessionStore<S>, config: &InspectorConfig) -> Self {
        let autosave = store.autosave().unwrap_or(config.autosave);
        Self {
            connection: Connection::new(Duration::from_millis(config.connect_timeout_ms)),
            engine: ReconciliationEngine::new(store),
            hierarchy: Vec::new(),
            selected: None,
            autosave,
            layout_export: None,
            reapplied: None,
        }
    }

    pub fn start(&mut self, transport: T) -> Result<(), InspectorError> {
        self.engine.clear_originals();
        self.connection.connect(transport)?;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.connection.disconnect();
        self.engine.clear_originals();
        self.hierarchy.clear();
        self.layout_export = None;
        self.reapplied = None;
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.state().is_connected()
    }

    pub async fn next_message(&mut self) -> Option<Message> {
        self.connection.recv().await
    }

    pub fn try_next_message(&mut self) -> Option<Message> {
        self.connection.try_recv()
    }

    pub fn connect_deadline(&self) -> Option<Instant> {
        self.connection.deadline()
    }

    pub fn check_connect_timeout(&mut self) -> bool {
        self.connection.check_timeout(Instant::now())
    }

    pub fn engine(&self) -> &ReconciliationEngine<S> {
        &self.engine
    }

    pub fn hierarchy(&self) -> &[ContainerNode] {
        &self.hierarchy
    }

    pub fn node(&self, id: &str) -> Option<&ContainerNode> {
        find_node(&self.hierarchy, id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<&ContainerNode> {
        self.node(self.selected.as_deref()?)
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    /// Manual save is offered only when connected and autosave is off.
    pub fn can_save(&self) -> bool {
        self.is_connected() && !self.autosave
    }

    pub fn active_session(&self) -> Option<String> {
        self.engine.active_session()
    }

    pub fn session_names(&self) -> Vec<String> {
        self.engine.session_names()
    }

    pub fn layout_export(&self) -> Option<&LayoutExport> {
        self.layout_export.as_ref()
    }

    /// Result of the automatic session reapply after the last capture, once.
    pub fn take_reapply_report(&mut self) -> Option<(String, LoadOutcome)> {
        self.reapplied.take()
    }

    pub fn handle_message(&mut self, message: Message) -> Refresh {
        self.connection.on_message();
        match message {
            Message::Hierarchy { data } => {
                self.hierarchy = data;
                if self.connection.state() != ConnectionState::Ready {
                    self.engine.capture_originals(&self.hierarchy);
                    self.connection.mark_ready();
                    self.reapply_active_session();
                }
                Refresh::Tree
            }
            Message::Updated {
                id,
                layout,
                layout_enabled,
                transform,
            } => match find_node_mut(&mut self.hierarchy, &id) {
                Some(node) => {
                    node.layout = layout;
                    node.transform = transform;
                    if let Some(enabled) = layout_enabled {
                        node.layout_enabled = enabled;
                    }
                    Refresh::Values
                }
                None => {
                    debug!("[inspector] update for unknown node {id}");
                    Refresh::Nothing
                }
            },
            Message::LayoutConfig { id, config } => match serde_json::to_string_pretty(&config) {
                Ok(json) => {
                    self.layout_export = Some(LayoutExport { id, json });
                    Refresh::LayoutReady
                }
                Err(e) => {
                    warn!("[inspector] cannot format layout of {id}: {e}");
                    Refresh::Nothing
                }
            },
            Message::FilterUpdated {
                id,
                filter_index,
                uniforms,
            } => {
                let filter = find_node_mut(&mut self.hierarchy, &id)
                    .and_then(|node| node.filters.as_mut())
                    .and_then(|filters| filters.iter_mut().find(|f| f.index == filter_index));
                match filter {
                    Some(filter) => {
                        filter.uniforms = uniforms;
                        Refresh::Values
                    }
                    None => {
                        debug!("[inspector] filter update for unknown {id}#{filter_index}");
                        Refresh::Nothing
                    }
                }
            }
            other => {
                debug!("[inspector] ignoring {} from another inspector", other.kind());
                Refresh::Nothing
            }
        }
    }

    fn reapply_active_session(&mut self) {
        let Some(name) = self.engine.active_session() else {
            return;
        };
        match self.engine.load_session(&name) {
            Some(outcome) => {
                self.push_all(&outcome.pushes);
                self.reapplied = Some((name, outcome));
            }
            None => warn!("[inspector] active session '{name}' is missing, nothing reapplied"),
        }
    }

    fn require_connected(&self) -> Result<(), InspectorError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(InspectorError::NotConnected)
        }
    }

    /// Sends a `set-property` and mirrors it onto the local snapshot until the echo arrives.
    fn push(&mut self, push: &PropertyPush) {
        let message = Message::set_property(&push.node_id, &push.property, push.value.clone());
        if let Err(e) = self.connection.post(&message) {
            warn!("[inspector] failed to send {}.{}: {e}", push.node_id, push.property);
        }
        let Some(node) = find_node_mut(&mut self.hierarchy, &push.node_id) else {
            return;
        };
        if push.property == LAYOUT_ENABLED_KEY {
            node.layout_enabled = push.value.as_ref().is_some_and(PropValue::is_truthy);
            return;
        }
        match namespace_of(&push.property) {
            Namespace::Transform => {
                if let Some(v) = push.value.as_ref().and_then(PropValue::as_f64) {
                    node.transform.set(&push.property, v);
                }
            }
            Namespace::Layout => match &push.value {
                Some(v) => {
                    node.layout.insert(push.property.clone(), v.clone());
                }
                None => {
                    node.layout.remove(&push.property);
                }
            },
        }
    }

    fn push_all(&mut self, pushes: &[PropertyPush]) {
        for push in pushes {
            self.push(push);
        }
    }

    fn post(&self, message: &Message) -> Result<(), InspectorError> {
        self.connection.post(message)?;
        Ok(())
    }

    fn autosave_active(&mut self) -> Result<(), InspectorError> {
        if !self.autosave {
            return Ok(());
        }
        if let Some(name) = self.engine.active_session() {
            self.engine.save_session(&name)?;
        }
        Ok(())
    }

    /// Selects a node (or clears the selection) and highlights it.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), InspectorError> {
        self.selected = id.map(str::to_string);
        if self.is_connected() {
            self.post(&Message::highlight(id, false))?;
        }
        Ok(())
    }

    /// Highlights the hovered node; ending the hover returns to the selection.
    pub fn hover(&mut self, id: Option<&str>) -> Result<(), InspectorError> {
        self.require_connected()?;
        let target = id.or(self.selected.as_deref());
        self.post(&Message::highlight(target, false))
    }

    /// Highlights a node together with its direct children.
    pub fn outline_children(&mut self, id: &str) -> Result<(), InspectorError> {
        self.require_connected()?;
        self.post(&Message::highlight(Some(id), true))
    }

    pub fn edit_property(
        &mut self,
        node_id: &str,
        property: &str,
        value: Option<PropValue>,
    ) -> Result<EditOutcome, InspectorError> {
        self.require_connected()?;
        // Transform properties cannot be cleared on the target, only set.
        if namespace_of(property) == Namespace::Transform && !matches!(value, Some(PropValue::Number(_))) {
            return Err(InspectorError::NotNumeric(property.to_string()));
        }
        let outcome = self.engine.record_edit(node_id, property, value.clone());
        self.push(&PropertyPush::new(node_id, property, value));
        self.autosave_active()?;
        Ok(outcome)
    }

    pub fn toggle_layout(&mut self, node_id: &str, enabled: bool) -> Result<(), InspectorError> {
        self.edit_property(node_id, LAYOUT_ENABLED_KEY, Some(PropValue::Bool(enabled)))?;
        Ok(())
    }

    pub fn edit_filter_uniform(
        &mut self,
        node_id: &str,
        filter_index: usize,
        group_name: &str,
        uniform_name: &str,
        value: UniformValue,
    ) -> Result<(), InspectorError> {
        self.require_connected()?;
        self.post(&Message::SetFilterUniform {
            id: node_id.to_string(),
            filter_index,
            group_name: group_name.to_string(),
            uniform_name: uniform_name.to_string(),
            value: value.clone(),
        })?;
        let uniform = find_node_mut(&mut self.hierarchy, node_id)
            .and_then(|node| node.filters.as_mut())
            .and_then(|filters| filters.iter_mut().find(|f| f.index == filter_index))
            .and_then(|filter| {
                filter
                    .uniforms
                    .iter_mut()
                    .find(|u| u.name == uniform_name && u.group_name == group_name)
            });
        if let Some(uniform) = uniform {
            uniform.value = value;
        }
        Ok(())
    }

    /// Pushes the originals back for one node. Returns the number of pushes.
    pub fn reset_node(&mut self, node_id: &str) -> Result<usize, InspectorError> {
        self.require_connected()?;
        let pushes = self.engine.reset_node(node_id);
        self.push_all(&pushes);
        Ok(pushes.len())
    }

    pub fn reset_all(&mut self) -> Result<usize, InspectorError> {
        self.require_connected()?;
        let pushes = self.engine.reset_all();
        self.push_all(&pushes);
        Ok(pushes.len())
    }

    pub fn save_session(&mut self) -> Result<(String, SaveOutcome), InspectorError> {
        let name = self.engine.active_session().ok_or(InspectorError::NoActiveSession)?;
        let outcome = self.engine.save_session(&name)?;
        Ok((name, outcome))
    }

    /// Saves the current changes under a new name and makes it active.
    pub fn create_session(&mut self, name: &str) -> Result<SaveOutcome, InspectorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InspectorError::EmptySessionName);
        }
        Ok(self.engine.save_session(name)?)
    }

    /// Loads `name` and replays its surviving changes.
    pub fn switch_session(&mut self, name: &str, policy: SwitchPolicy) -> Result<LoadOutcome, InspectorError> {
        self.require_connected()?;
        if let Some(current) = self.engine.active_session() {
            let save_first = self.autosave || (self.engine.has_unsaved_changes() && policy == SwitchPolicy::SaveFirst);
            if save_first && current != name {
                self.engine.save_session(&current)?;
            }
        }
        let outcome = self
            .engine
            .load_session(name)
            .ok_or_else(|| InspectorError::SessionNotFound(name.to_string()))?;
        self.push_all(&outcome.pushes);
        Ok(outcome)
    }

    pub fn delete_session(&mut self, name: &str) -> Result<(), InspectorError> {
        Ok(self.engine.delete_session(name)?)
    }

    pub fn set_autosave(&mut self, enabled: bool) -> Result<(), InspectorError> {
        self.engine.store_mut().set_autosave(enabled)?;
        self.autosave = enabled;
        info!("[inspector] autosave {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    /// Requests a fresh hierarchy. Originals are not re-captured.
    pub fn refresh(&mut self) -> Result<(), InspectorError> {
        self.require_connected()?;
        self.post(&Message::GetHierarchy)
    }

    /// Asks the target for a node's layout; the reply lands in `layout_export`.
    pub fn request_layout(&mut self, node_id: &str) -> Result<(), InspectorError> {
        self.require_connected()?;
        self.post(&Message::GetLayout { id: node_id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use scenelens_devkit::{fixtures, validate, MessageBuilder, MockChannel, TestHarness};
    use scenelens_protocol::LayoutMap;

    fn inspector() -> (Inspector<MockChannel, MemoryStore>, MockChannel) {
        inspector_with(MemoryStore::new())
    }

    fn inspector_with(store: MemoryStore) -> (Inspector<MockChannel, MemoryStore>, MockChannel) {
        let mut inspector = Inspector::new(SessionStore::open(store), &InspectorConfig::default());
        let channel = MockChannel::new();
        inspector.start(channel.clone()).unwrap();
        channel.clear_posted();
        (inspector, channel)
    }

    fn root_snapshot(width: f64) -> Message {
        MessageBuilder::hierarchy(vec![fixtures::root_with_width(width)])
    }

    fn num(v: f64) -> Option<PropValue> {
        Some(PropValue::Number(v))
    }

    #[test]
    fn edits_are_rejected_before_connecting() {
        let mut inspector: Inspector<MockChannel, MemoryStore> =
            Inspector::new(SessionStore::open(MemoryStore::new()), &InspectorConfig::default());
        let err = inspector.edit_property("Root", "width", num(150.0)).unwrap_err();
        assert!(matches!(err, InspectorError::NotConnected));
        assert!(inspector.engine().changes().is_empty());
    }

    #[test]
    fn width_round_trip_leaves_no_changes() {
        let (mut inspector, channel) = inspector();
        assert_eq!(inspector.handle_message(root_snapshot(100.0)), Refresh::Tree);
        assert_eq!(inspector.state(), ConnectionState::Ready);

        inspector.edit_property("Root", "width", num(150.0)).unwrap();
        assert_eq!(inspector.engine().changes()["Root"]["width"], num(150.0));
        inspector.edit_property("Root", "width", num(100.0)).unwrap();
        assert!(inspector.engine().changes().is_empty());

        assert_eq!(
            channel.posted(),
            vec![
                Message::set_property("Root", "width", num(150.0)),
                Message::set_property("Root", "width", num(100.0)),
            ]
        );
    }

    #[test]
    fn later_snapshots_do_not_recapture() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.handle_message(root_snapshot(150.0));
        assert_eq!(
            inspector.engine().original_value("Root", "width"),
            Some(&PropValue::Number(100.0))
        );
        assert_eq!(
            inspector.node("Root").and_then(|n| n.live_value("width")),
            num(150.0)
        );
    }

    #[test]
    fn reconnect_recaptures_originals() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.stop();
        assert!(!inspector.engine().has_originals());

        inspector.start(MockChannel::new()).unwrap();
        inspector.handle_message(root_snapshot(150.0));
        assert_eq!(
            inspector.engine().original_value("Root", "width"),
            Some(&PropValue::Number(150.0))
        );
    }

    #[test]
    fn stop_forgets_the_previous_snapshot() {
        let (mut inspector, channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.request_layout("Root").unwrap();
        inspector.handle_message(MessageBuilder::layout_config(&fixtures::root_with_width(100.0)));
        assert!(inspector.layout_export().is_some());

        inspector.stop();
        assert!(inspector.hierarchy().is_empty());
        assert!(inspector.node("Root").is_none());
        assert!(inspector.layout_export().is_none());
        assert!(inspector.take_reapply_report().is_none());
        assert!(channel.posted_kinds().contains(&"get-layout"));
    }

    #[test]
    fn transform_edits_must_be_numbers() {
        let (mut inspector, channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        channel.clear_posted();

        let cleared = inspector.edit_property("Root", "x", None).unwrap_err();
        assert!(matches!(cleared, InspectorError::NotNumeric(ref p) if p == "x"));
        let text = inspector.edit_property("Root", "alpha", Some(PropValue::Text("half".into())));
        assert!(matches!(text, Err(InspectorError::NotNumeric(_))));
        assert!(inspector.engine().changes().is_empty());
        assert!(channel.posted().is_empty());

        // Layout keys can still be cleared.
        inspector.edit_property("Root", "width", None).unwrap();
        assert_eq!(inspector.engine().changes()["Root"]["width"], None);
    }

    #[test]
    fn round_trip_through_harness_matches_wire_contracts() {
        let mut harness = TestHarness::new();
        let mut inspector = Inspector::new(SessionStore::open(MemoryStore::new()), &InspectorConfig::default());
        inspector.start(harness.endpoint()).unwrap();
        harness.inject(MessageBuilder::hierarchy(fixtures::snapshot()));
        while let Some(message) = inspector.try_next_message() {
            inspector.handle_message(message);
        }
        assert_eq!(inspector.state(), ConnectionState::Ready);

        inspector.select(Some("Board")).unwrap();
        inspector.edit_property("Board", "gap", num(16.0)).unwrap();
        inspector.outline_children("Board").unwrap();
        inspector.edit_filter_uniform("Card0", 0, "glowUniforms", "uStrength", UniformValue::Scalar(2.0)).unwrap();

        harness
            .expect_messages("get-hierarchy", 1)
            .expect_messages("highlight", 2)
            .expect_messages("set-property", 1)
            .expect_messages("set-filter-uniform", 1);
        harness.verify_expectations().unwrap();
        harness.assert_message_sent(&Message::highlight(Some("Board"), true)).unwrap();
        for message in harness.channel.posted() {
            let contract = validate(&message.to_value().unwrap()).unwrap();
            assert_eq!(contract.direction, message.direction());
        }
        assert_eq!(harness.stats().total_messages, 5);
    }

    #[test]
    fn stale_session_is_skipped_after_reconnect() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.edit_property("Root", "width", num(150.0)).unwrap();
        inspector.create_session("S1").unwrap();

        inspector.stop();
        let channel = MockChannel::new();
        inspector.start(channel.clone()).unwrap();
        channel.clear_posted();
        inspector.handle_message(root_snapshot(150.0));

        let (name, report) = inspector.take_reapply_report().unwrap();
        assert_eq!(name, "S1");
        assert_eq!(report.skipped, 1);
        assert!(inspector.engine().changes().is_empty());
        assert!(channel.posted().is_empty());
    }

    #[test]
    fn active_session_is_reapplied_on_connect() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.edit_property("Root", "width", num(150.0)).unwrap();
        inspector.create_session("S1").unwrap();

        inspector.stop();
        let channel = MockChannel::new();
        inspector.start(channel.clone()).unwrap();
        channel.clear_posted();
        inspector.handle_message(root_snapshot(100.0));

        assert_eq!(channel.posted(), vec![Message::set_property("Root", "width", num(150.0))]);
        assert_eq!(inspector.engine().change_count(), 1);
        assert_eq!(inspector.node("Root").and_then(|n| n.live_value("width")), num(150.0));
    }

    #[test]
    fn reset_restores_local_snapshot() {
        let (mut inspector, channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.edit_property("Root", "x", num(40.0)).unwrap();
        inspector.edit_property("Root", "width", num(150.0)).unwrap();
        channel.clear_posted();

        assert_eq!(inspector.reset_node("Root").unwrap(), 2);
        let root = inspector.node("Root").unwrap();
        for prop in ["x", "width"] {
            assert_eq!(
                inspector.engine().effective_value(root, prop).as_ref(),
                inspector.engine().original_value("Root", prop)
            );
        }
        assert_eq!(channel.posted().len(), 2);
    }

    #[test]
    fn autosave_saves_active_session_on_edit() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.create_session("S1").unwrap();
        inspector.set_autosave(true).unwrap();
        assert!(!inspector.can_save());

        inspector.edit_property("Root", "gap", num(12.0)).unwrap();
        let stored = inspector.engine().store().read_session("S1").unwrap();
        assert_eq!(stored.changes["Root"]["gap"], num(12.0));
        assert!(!inspector.engine().has_unsaved_changes());
    }

    #[test]
    fn autosave_preference_survives_restart() {
        let store = MemoryStore::new().with_entry(crate::store::AUTOSAVE_KEY, "true");
        let (inspector, _channel) = inspector_with(store);
        assert!(inspector.autosave());
    }

    #[test]
    fn switch_saves_first_when_asked() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.create_session("empty").unwrap();
        inspector.create_session("S1").unwrap();
        inspector.edit_property("Root", "width", num(150.0)).unwrap();

        let loaded = inspector.switch_session("empty", SwitchPolicy::SaveFirst).unwrap();
        assert!(loaded.pushes.is_empty());
        assert_eq!(inspector.active_session().as_deref(), Some("empty"));
        let s1 = inspector.engine().store().read_session("S1").unwrap();
        assert_eq!(s1.changes["Root"]["width"], num(150.0));
    }

    #[test]
    fn switch_can_discard_unsaved_edits() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.create_session("empty").unwrap();
        inspector.create_session("S1").unwrap();
        inspector.edit_property("Root", "width", num(150.0)).unwrap();

        inspector.switch_session("empty", SwitchPolicy::Discard).unwrap();
        assert!(inspector.engine().store().read_session("S1").unwrap().changes.is_empty());
        assert!(matches!(
            inspector.switch_session("missing", SwitchPolicy::Discard),
            Err(InspectorError::SessionNotFound(_))
        ));
    }

    #[test]
    fn save_requires_active_session() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        assert!(matches!(inspector.save_session(), Err(InspectorError::NoActiveSession)));
        assert!(matches!(inspector.create_session("   "), Err(InspectorError::EmptySessionName)));
    }

    #[test]
    fn hover_falls_back_to_selection() {
        let (mut inspector, channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.select(Some("Root")).unwrap();
        inspector.hover(Some("Other")).unwrap();
        inspector.hover(None).unwrap();
        assert_eq!(
            channel.posted(),
            vec![
                Message::highlight(Some("Root"), false),
                Message::highlight(Some("Other"), false),
                Message::highlight(Some("Root"), false),
            ]
        );
    }

    #[test]
    fn layout_toggle_is_sent_but_not_tracked() {
        let (mut inspector, channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        inspector.toggle_layout("Root", false).unwrap();
        assert!(inspector.engine().changes().is_empty());
        assert!(!inspector.node("Root").unwrap().layout_enabled);
        assert_eq!(
            channel.posted(),
            vec![Message::set_property("Root", LAYOUT_ENABLED_KEY, Some(PropValue::Bool(false)))]
        );
    }

    #[test]
    fn updated_echo_refreshes_values_only() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        let mut layout = LayoutMap::new();
        layout.insert("width".into(), PropValue::Number(120.0));
        let refresh = inspector.handle_message(Message::Updated {
            id: "Root".into(),
            layout,
            layout_enabled: None,
            transform: Default::default(),
        });
        assert_eq!(refresh, Refresh::Values);
        assert_eq!(inspector.node("Root").and_then(|n| n.live_value("width")), num(120.0));
        assert!(inspector.node("Root").unwrap().layout_enabled);
    }

    #[test]
    fn layout_config_is_kept_as_pretty_json() {
        let (mut inspector, _channel) = inspector();
        inspector.handle_message(root_snapshot(100.0));
        let mut config = LayoutMap::new();
        config.insert("width".into(), PropValue::Number(100.0));
        let refresh = inspector.handle_message(Message::LayoutConfig {
            id: "Root".into(),
            config,
        });
        assert_eq!(refresh, Refresh::LayoutReady);
        assert_eq!(inspector.layout_export().unwrap().json, "{\n  \"width\": 100.0\n}");
    }

    #[test]
    fn filter_edit_updates_snapshot() {
        let (mut inspector, channel) = inspector();
        inspector.handle_message(MessageBuilder::hierarchy(fixtures::snapshot()));
        inspector
            .edit_filter_uniform("Card0", 0, "glowUniforms", "uStrength", UniformValue::Scalar(7.5))
            .unwrap();
        let card = inspector.node("Card0").unwrap();
        let uniform = card.filters.as_ref().unwrap()[0]
            .uniforms
            .iter()
            .find(|u| u.name == "uStrength")
            .unwrap();
        assert_eq!(uniform.value, UniformValue::Scalar(7.5));
        assert_eq!(channel.posted_kinds(), vec!["set-filter-uniform"]);
    }
}
