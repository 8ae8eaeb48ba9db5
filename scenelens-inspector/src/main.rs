/**
 * SCENELENS INSPECTOR - terminal front end
 *
 * transport: local  -> an in-process hub with the demo scene bridged onto it
 * transport: mqtt   -> the configured broker, for a separately running target
 *
 * Config: SCENELENS_INSPECTOR_CONFIG (default inspector.yaml), .env honoured.
 * Logs go to stderr so command output stays readable on stdout.
 */

use anyhow::{Context, Result};
use scenelens_bridge::demo::demo_scene;
use scenelens_bridge::{new_state, BridgeConfig, DebugBridge};
use scenelens_inspector::cli::{Command, Console, HELP};
use scenelens_inspector::config::load_config;
use scenelens_inspector::{Inspector, InspectorConfig, JsonFileStore, KeyValueStore, SessionStore, TransportKind};
use scenelens_protocol::{BroadcastHub, MqttTransport, Transport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config().await;
    let file = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("failed to open session store {}", config.store_path.display()))?;
    let store = SessionStore::open(file);

    match config.transport {
        TransportKind::Local => {
            info!("[inspector] local demo target on channel '{}'", config.channel);
            let hub = BroadcastHub::new(&config.channel);
            let bridge_config = BridgeConfig {
                channel: config.channel.clone(),
                ..BridgeConfig::default()
            };
            let target = DebugBridge::new(new_state(demo_scene()), bridge_config).start(hub.endpoint());
            let inspector = Inspector::new(store, &config);
            let result = run(inspector, || Ok(hub.endpoint())).await;
            target.stop().await;
            result
        }
        TransportKind::Mqtt => {
            info!(
                "[inspector] broker {}:{}, channel '{}'",
                config.mqtt.host, config.mqtt.port, config.channel
            );
            let InspectorConfig { mqtt, channel, .. } = config.clone();
            let inspector = Inspector::new(store, &config);
            run(inspector, move || {
                MqttTransport::connect(&mqtt, &channel).context("failed to open MQTT channel")
            })
            .await
        }
    }
}

async fn run<T, S, F>(mut inspector: Inspector<T, S>, mut open: F) -> Result<()>
where
    T: Transport,
    S: KeyValueStore,
    F: FnMut() -> Result<T>,
{
    let mut console = Console::new();
    inspector.start(open()?)?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = inspector.connect_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Connect => match open().and_then(|t| Ok(inspector.start(t)?)) {
                        Ok(()) => println!("connecting..."),
                        Err(e) => println!("error: {e:#}"),
                    },
                    Command::Disconnect => {
                        inspector.stop();
                        println!("disconnected");
                    }
                    command => match console.execute(&mut inspector, command) {
                        Ok(out) if out.is_empty() => {}
                        Ok(out) => println!("{out}"),
                        Err(e) => println!("error: {e}"),
                    },
                }
            }
            message = inspector.next_message() => match message {
                Some(message) => {
                    let refresh = inspector.handle_message(message);
                    if let Some(out) = console.on_refresh(&mut inspector, refresh) {
                        println!("{out}");
                    }
                }
                None => {
                    warn!("[inspector] channel closed by the other side");
                    inspector.stop();
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                inspector.check_connect_timeout();
            }
        }
    }

    inspector.stop();
    if inspector.engine().has_unsaved_changes() {
        warn!("[inspector] exiting with unsaved changes");
    }
    Ok(())
}
