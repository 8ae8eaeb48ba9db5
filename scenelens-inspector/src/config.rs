use scenelens_protocol::config::load_or_default;
use scenelens_protocol::{MqttSettings, DEFAULT_CHANNEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// In-process hub with the demo target attached.
    #[default]
    Local,
    Mqtt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub channel: String,
    pub transport: TransportKind,
    pub mqtt: MqttSettings,
    pub store_path: PathBuf,
    /// Silence after connect before the diagnostic is logged.
    pub connect_timeout_ms: u64,
    /// Used only until a preference has been stored.
    pub autosave: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            transport: TransportKind::Local,
            mqtt: MqttSettings::default(),
            store_path: PathBuf::from("./scenelens-sessions.json"),
            connect_timeout_ms: 1000,
            autosave: false,
        }
    }
}

pub async fn load_config() -> InspectorConfig {
    load_or_default("SCENELENS_INSPECTOR_CONFIG", "inspector.yaml", "inspector").await
}
