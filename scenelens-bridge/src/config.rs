use scenelens_protocol::config::load_or_default;
use scenelens_protocol::{MqttSettings, DEFAULT_CHANNEL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub channel: String,
    pub mqtt: MqttSettings,
    /// Delay before the unsolicited first hierarchy broadcast.
    pub initial_broadcast_delay_ms: u64,
    /// Overlay redraws are flushed at this cadence.
    pub frame_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            mqtt: MqttSettings::default(),
            initial_broadcast_delay_ms: 100,
            frame_interval_ms: 16,
        }
    }
}

pub async fn load_config() -> BridgeConfig {
    load_or_default("SCENELENS_BRIDGE_CONFIG", "bridge.yaml", "bridge").await
}
