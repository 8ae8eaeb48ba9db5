use super::{Envelope, Transport, TransportError};
use crate::message::Message;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};
use uuid::Uuid;

const HUB_CAPACITY: usize = 256;

/// In-process broadcast channel. Every endpoint sees every other endpoint's posts.
#[derive(Clone)]
pub struct BroadcastHub {
    name: Arc<str>,
    sender: broadcast::Sender<Envelope>,
}

impl BroadcastHub {
    pub fn new(name: &str) -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);
        Self { name: Arc::from(name), sender }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opens a new endpoint. It only receives messages posted after this call.
    pub fn endpoint(&self) -> LocalEndpoint {
        LocalEndpoint {
            origin: Uuid::new_v4().to_string(),
            channel: self.name.clone(),
            sender: Some(self.sender.clone()),
            receiver: Some(self.sender.subscribe()),
        }
    }
}

pub struct LocalEndpoint {
    origin: String,
    channel: Arc<str>,
    sender: Option<broadcast::Sender<Envelope>>,
    receiver: Option<broadcast::Receiver<Envelope>>,
}

impl LocalEndpoint {
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Transport for LocalEndpoint {
    fn post(&self, message: &Message) -> Result<(), TransportError> {
        let sender = self.sender.as_ref().ok_or(TransportError::Closed)?;
        let envelope = Envelope {
            origin: self.origin.clone(),
            message: message.clone(),
        };
        // No other subscriber is not an error on a broadcast channel.
        if sender.send(envelope).is_err() {
            debug!("[{}] no listener for {}", self.channel, message.kind());
        }
        Ok(())
    }

    async fn recv(&mut self) -> Option<Message> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(envelope) if envelope.origin == self.origin => continue,
                Ok(envelope) => return Some(envelope.message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[{}] endpoint lagged, {skipped} messages dropped", self.channel);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn try_recv(&mut self) -> Option<Message> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.try_recv() {
                Ok(envelope) if envelope.origin == self.origin => continue,
                Ok(envelope) => return Some(envelope.message),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("[{}] endpoint lagged, {skipped} messages dropped", self.channel);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    fn close(&mut self) {
        self.sender = None;
        self.receiver = None;
    }

    fn is_open(&self) -> bool {
        self.receiver.is_some()
    }
}
