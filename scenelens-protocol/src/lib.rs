//! SceneLens protocol - the contract between an inspected process and its inspector.
//!
//! - `node`: the plain, acyclic `ContainerNode` snapshot broadcast by the bridge
//! - `value`: property and filter-uniform values with strict, type-aware equality
//! - `keys`: the closed sets of layout and transform property names
//! - `message`: the one-way message union carried on the channel
//! - `transport`: the duplex best-effort channel (in-process hub or MQTT topic)
//! - `config`: YAML loading shared by the binaries

pub mod config;
pub mod keys;
pub mod message;
pub mod node;
pub mod transport;
pub mod value;

pub use keys::{namespace_of, Namespace, LAYOUT_ENABLED_KEY, LAYOUT_KEYS, TRANSFORM_KEYS};
pub use message::{Direction, Message, ProtocolError};
pub use node::{find_node, find_node_mut, ContainerNode, FilterInfo, FilterUniform, LayoutMap, PropMap, Transform};
pub use transport::{BroadcastHub, LocalEndpoint, MqttSettings, MqttTransport, Transport, TransportError, DEFAULT_CHANNEL};
pub use value::{PropValue, UniformType, UniformValue};
