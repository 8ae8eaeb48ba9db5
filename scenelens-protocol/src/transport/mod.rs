//! Duplex best-effort channel between inspector and target.
//!
//! Posting never waits for the other side. A posted message is delivered to
//! every other endpoint on the same channel, never back to its sender.

mod local;
mod mqtt;

pub use local::{BroadcastHub, LocalEndpoint};
pub use mqtt::MqttTransport;

use crate::message::{Message, ProtocolError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Logical channel name shared by every inspector/target pair.
pub const DEFAULT_CHANNEL: &str = "layout-editor";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel is closed")]
    Closed,
    #[error(transparent)]
    Codec(#[from] ProtocolError),
    #[error("mqtt client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),
}

pub trait Transport: Send {
    /// Fire-and-forget post to every other endpoint.
    fn post(&self, message: &Message) -> Result<(), TransportError>;

    /// Next message from another endpoint; `None` once the channel is closed.
    fn recv(&mut self) -> impl Future<Output = Option<Message>> + Send;

    /// Non-blocking receive.
    fn try_recv(&mut self) -> Option<Message>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttSettings {
    pub host: String,
    pub port: u16,
    pub keep_alive_secs: u64,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            keep_alive_secs: 15,
        }
    }
}

/// Wire wrapper carrying the sender id so endpoints can drop their own echoes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Envelope {
    pub origin: String,
    pub message: Message,
}
