//! SceneLens inspector - viewer side of the scene debugger.
//!
//! - `reconcile`: live originals, session deltas, save/load validation
//! - `store`: durable key/value session storage
//! - `connection`: channel lifecycle and the no-response diagnostic
//! - `inspector`: the context object front ends drive
//! - `present`: tree, property, change and filter view models
//! - `cli`: line-oriented terminal front end

pub mod cli;
pub mod config;
pub mod connection;
pub mod inspector;
pub mod present;
pub mod reconcile;
pub mod store;

pub use config::{InspectorConfig, TransportKind};
pub use connection::ConnectionState;
pub use inspector::{Inspector, InspectorError, LayoutExport, Refresh, SwitchPolicy};
pub use reconcile::{
    EditOutcome, LiveOriginals, LoadOutcome, NodeChanges, PropertyPush, PropertyStatus, ReconciliationEngine,
    SaveOutcome, SessionChanges,
};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SessionRecord, SessionStore, StoreError};
