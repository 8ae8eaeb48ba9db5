/**
 * DEBUG BRIDGE - target-side lifecycle
 *
 * ROLE: Owns the channel for one inspected scene. Announces the hierarchy once
 * after start, answers every inspector command through the executor and flushes
 * overlay redraws once per frame.
 *
 * LIFECYCLE: `start` spawns the loop and returns a handle; `BridgeHandle::stop`
 * ends it and closes the channel. There is no global bridge instance.
 */

use crate::config::BridgeConfig;
use crate::executor::CommandExecutor;
use crate::scene::SceneGraph;
use crate::state::{with_locked, Shared};
use scenelens_protocol::{Message, Transport};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct DebugBridge<S> {
    scene: Shared<S>,
    executor: CommandExecutor,
    config: BridgeConfig,
}

impl<S: SceneGraph + Send + 'static> DebugBridge<S> {
    pub fn new(scene: Shared<S>, config: BridgeConfig) -> Self {
        Self {
            scene,
            executor: CommandExecutor::new(),
            config,
        }
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Handles one message and posts its replies.
    pub fn dispatch<T: Transport>(&mut self, transport: &T, message: Message) {
        let executor = &mut self.executor;
        let replies = with_locked(&self.scene, |scene| executor.handle(scene, message));
        for reply in replies {
            post(transport, &reply);
        }
    }

    pub fn broadcast_hierarchy<T: Transport>(&self, transport: &T) {
        let message = with_locked(&self.scene, |scene| self.executor.hierarchy(scene));
        post(transport, &message);
    }

    pub fn flush_overlays(&mut self) -> usize {
        let executor = &mut self.executor;
        with_locked(&self.scene, |scene| executor.flush_overlays(scene))
    }

    pub fn start<T: Transport + 'static>(self, transport: T) -> BridgeHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let channel = self.config.channel.clone();
        let task = tokio::spawn(self.run(transport, stop_rx));
        info!("[bridge] started on channel '{channel}'");
        BridgeHandle {
            stop: Some(stop_tx),
            task,
        }
    }

    async fn run<T: Transport>(mut self, mut transport: T, mut stop: oneshot::Receiver<()>) {
        let initial = tokio::time::sleep(Duration::from_millis(self.config.initial_broadcast_delay_ms));
        tokio::pin!(initial);
        let mut announced = false;
        let mut frames = tokio::time::interval(Duration::from_millis(self.config.frame_interval_ms.max(1)));
        frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = &mut initial, if !announced => {
                    announced = true;
                    self.broadcast_hierarchy(&transport);
                }
                incoming = transport.recv() => match incoming {
                    Some(message) => self.dispatch(&transport, message),
                    None => {
                        info!("[bridge] channel closed");
                        break;
                    }
                },
                _ = frames.tick() => {
                    let drawn = self.flush_overlays();
                    if drawn > 0 {
                        debug!("[bridge] redrew {drawn} overlays");
                    }
                }
            }
        }

        with_locked(&self.scene, |scene| self.executor.highlight(scene, None, false));
        transport.close();
        info!("[bridge] stopped");
    }
}

fn post<T: Transport>(transport: &T, message: &Message) {
    if let Err(e) = transport.post(message) {
        warn!("[bridge] failed to post {}: {e}", message.kind());
    }
}

pub struct BridgeHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Stops the loop, removes highlights and closes the channel.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("[bridge] task ended abnormally: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
