/**
 * RECONCILIATION ENGINE - originals, deltas and named sessions
 *
 * ROLE: Keeps the per-connection baseline (`LiveOriginals`) captured from the
 * first hierarchy snapshot and the per-node delta set the user has edited on
 * top of it. Only values that differ from the baseline are ever stored, both
 * in memory and in saved sessions.
 *
 * VALIDATION: saving and loading both re-compare against the current baseline,
 * so a session never pushes a value the live scene already has.
 */

use crate::store::{KeyValueStore, SessionRecord, SessionStore, StoreError};
use scenelens_protocol::{namespace_of, ContainerNode, Namespace, PropMap, PropValue, LAYOUT_ENABLED_KEY};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Property name to edited value. `None` means the property was cleared.
pub type NodeChanges = BTreeMap<String, Option<PropValue>>;

/// Node id to its edited properties.
pub type SessionChanges = BTreeMap<String, NodeChanges>;

/// Value copies of a node's layout and transform at capture time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveOriginals {
    pub layout: PropMap,
    pub transform: PropMap,
}

impl LiveOriginals {
    pub fn of(node: &ContainerNode) -> Self {
        Self {
            layout: node.layout.clone(),
            transform: node.transform.to_map(),
        }
    }

    pub fn get(&self, property: &str) -> Option<&PropValue> {
        match namespace_of(property) {
            Namespace::Transform => self.transform.get(property),
            Namespace::Layout => self.layout.get(property),
        }
    }
}

/// One `set-property` to replay against the target.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPush {
    pub node_id: String,
    pub property: String,
    pub value: Option<PropValue>,
}

impl PropertyPush {
    pub fn new(node_id: &str, property: &str, value: Option<PropValue>) -> Self {
        Self {
            node_id: node_id.to_string(),
            property: property.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub pushes: Vec<PropertyPush>,
    /// Stored values dropped because the live scene already has them.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub nodes: usize,
    pub properties: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Stored as a delta.
    Recorded,
    /// Equal to the original; any previous delta was removed.
    Reverted,
    /// Not tracked (layout participation toggle).
    Untracked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyStatus {
    Unchanged,
    Was(PropValue),
    New,
}

pub struct ReconciliationEngine<S> {
    originals: HashMap<String, LiveOriginals>,
    changes: SessionChanges,
    unsaved: bool,
    store: SessionStore<S>,
}

impl<S: KeyValueStore> ReconciliationEngine<S> {
    pub fn new(store: SessionStore<S>) -> Self {
        Self {
            originals: HashMap::new(),
            changes: SessionChanges::new(),
            unsaved: false,
            store,
        }
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.store
    }

    /// Replaces the baseline with value copies of every node in `roots`.
    /// Ids are not unique; the first node in depth-first order wins.
    pub fn capture_originals(&mut self, roots: &[ContainerNode]) {
        self.originals.clear();
        for root in roots {
            root.walk(&mut |node| {
                self.originals
                    .entry(node.id.clone())
                    .or_insert_with(|| LiveOriginals::of(node));
            });
        }
        info!("[inspector] captured originals for {} nodes", self.originals.len());
    }

    pub fn clear_originals(&mut self) {
        self.originals.clear();
    }

    pub fn has_originals(&self) -> bool {
        !self.originals.is_empty()
    }

    pub fn originals_of(&self, node_id: &str) -> Option<&LiveOriginals> {
        self.originals.get(node_id)
    }

    pub fn original_value(&self, node_id: &str, property: &str) -> Option<&PropValue> {
        self.originals.get(node_id)?.get(property)
    }

    /// Stores `value` only when it differs from the original.
    pub fn record_edit(&mut self, node_id: &str, property: &str, value: Option<PropValue>) -> EditOutcome {
        if property == LAYOUT_ENABLED_KEY {
            return EditOutcome::Untracked;
        }

        if value.as_ref() == self.original_value(node_id, property) {
            if let Some(node) = self.changes.get_mut(node_id) {
                node.remove(property);
                if node.is_empty() {
                    self.changes.remove(node_id);
                }
            }
            return EditOutcome::Reverted;
        }

        self.changes
            .entry(node_id.to_string())
            .or_default()
            .insert(property.to_string(), value);
        self.unsaved = true;
        EditOutcome::Recorded
    }

    pub fn changes(&self) -> &SessionChanges {
        &self.changes
    }

    pub fn node_changes(&self, node_id: &str) -> Option<&NodeChanges> {
        self.changes.get(node_id)
    }

    pub fn changed_node_ids(&self) -> BTreeSet<String> {
        self.changes.keys().cloned().collect()
    }

    pub fn change_count(&self) -> usize {
        self.changes.values().map(BTreeMap::len).sum()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Session value when one is recorded, else the live value of `node`.
    pub fn effective_value(&self, node: &ContainerNode, property: &str) -> Option<PropValue> {
        match self.changes.get(&node.id).and_then(|c| c.get(property)) {
            Some(value) => value.clone(),
            None => node.live_value(property),
        }
    }

    pub fn property_status(&self, node_id: &str, property: &str, effective: Option<&PropValue>) -> PropertyStatus {
        let original = self.original_value(node_id, property);
        if effective == original {
            return PropertyStatus::Unchanged;
        }
        match original {
            Some(value) => PropertyStatus::Was(value.clone()),
            None => PropertyStatus::New,
        }
    }

    /// Persists the true deltas under `name` and makes it the active session.
    pub fn save_session(&mut self, name: &str) -> Result<SaveOutcome, StoreError> {
        let mut kept = SessionChanges::new();
        for (node_id, props) in &self.changes {
            let deltas: NodeChanges = props
                .iter()
                .filter(|(prop, value)| value.as_ref() != self.original_value(node_id, prop))
                .map(|(prop, value)| (prop.clone(), value.clone()))
                .collect();
            if !deltas.is_empty() {
                kept.insert(node_id.clone(), deltas);
            }
        }

        let outcome = SaveOutcome {
            nodes: kept.len(),
            properties: kept.values().map(BTreeMap::len).sum(),
        };
        let record = SessionRecord {
            changes: kept,
            saved_at: Some(OffsetDateTime::now_utc()),
        };
        self.store.write_session(name, &record)?;
        self.store.set_active_session(name)?;
        self.unsaved = false;
        info!(
            "[inspector] saved session '{name}' ({} properties on {} nodes)",
            outcome.properties, outcome.nodes
        );
        Ok(outcome)
    }

    /// Replaces the in-memory changes with the stored session, minus values the
    /// live scene already has. `None` when the session is missing or unreadable.
    pub fn load_session(&mut self, name: &str) -> Option<LoadOutcome> {
        let record = self.store.read_session(name)?;
        self.changes.clear();

        let mut outcome = LoadOutcome::default();
        for (node_id, props) in record.changes {
            for (prop, value) in props {
                if value.as_ref() == self.original_value(&node_id, &prop) {
                    debug!("[inspector] {node_id}.{prop} already live, skipping");
                    outcome.skipped += 1;
                    continue;
                }
                outcome.pushes.push(PropertyPush::new(&node_id, &prop, value.clone()));
                self.changes.entry(node_id.clone()).or_default().insert(prop, value);
            }
        }

        if let Err(e) = self.store.set_active_session(name) {
            warn!("[inspector] failed to mark '{name}' active: {e}");
        }
        self.unsaved = false;
        info!(
            "[inspector] loaded session '{name}': {} changes, {} skipped",
            outcome.pushes.len(),
            outcome.skipped
        );
        Some(outcome)
    }

    pub fn delete_session(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.delete_session(name)?;
        info!("[inspector] deleted session '{name}'");
        Ok(())
    }

    pub fn session_names(&self) -> Vec<String> {
        self.store.session_names()
    }

    pub fn active_session(&self) -> Option<String> {
        self.store.active_session()
    }

    /// Drops the node's deltas and returns the original values to push back.
    /// A node never seen live resets every edited property to `None`.
    pub fn reset_node(&mut self, node_id: &str) -> Vec<PropertyPush> {
        let Some(props) = self.changes.remove(node_id) else {
            return Vec::new();
        };
        self.unsaved = true;
        props
            .into_keys()
            .map(|prop| {
                let original = self.original_value(node_id, &prop).cloned();
                PropertyPush::new(node_id, &prop, original)
            })
            .collect()
    }

    pub fn reset_all(&mut self) -> Vec<PropertyPush> {
        let ids: Vec<String> = self.changes.keys().cloned().collect();
        ids.iter().flat_map(|id| self.reset_node(id)).collect()
    }
}
