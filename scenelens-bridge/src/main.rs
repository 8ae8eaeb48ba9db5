/**
 * SCENELENS BRIDGE - demo target process
 *
 * Serves the demo scene on the configured MQTT channel until Ctrl-C.
 * Config: SCENELENS_BRIDGE_CONFIG (default bridge.yaml), .env honoured.
 */

use anyhow::{Context, Result};
use scenelens_bridge::config::load_config;
use scenelens_bridge::demo::demo_scene;
use scenelens_bridge::{new_state, DebugBridge};
use scenelens_protocol::MqttTransport;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config().await;
    info!("[bridge] broker {}:{}, channel '{}'", config.mqtt.host, config.mqtt.port, config.channel);

    let transport = MqttTransport::connect(&config.mqtt, &config.channel).context("failed to open MQTT channel")?;
    let scene = new_state(demo_scene());
    let handle = DebugBridge::new(scene, config).start(transport);

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("[bridge] shutting down");
    handle.stop().await;
    Ok(())
}
