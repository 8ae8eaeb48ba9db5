//! Inspector side of the channel: open, request the hierarchy, watch for silence.

use scenelens_protocol::{Message, Transport, TransportError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Hierarchy requested, nothing received yet.
    Connecting,
    /// Messages arriving, originals not yet captured.
    AwaitingSnapshot,
    /// Originals captured from the first snapshot.
    Ready,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::AwaitingSnapshot | Self::Ready)
    }
}

pub struct Connection<T> {
    transport: Option<T>,
    state: ConnectionState,
    timeout: Duration,
    deadline: Option<Instant>,
}

impl<T: Transport> Connection<T> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            transport: None,
            state: ConnectionState::Disconnected,
            timeout,
            deadline: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Replaces any open transport and requests the hierarchy.
    pub fn connect(&mut self, transport: T) -> Result<(), TransportError> {
        self.disconnect();
        transport.post(&Message::GetHierarchy)?;
        self.transport = Some(transport);
        self.state = ConnectionState::Connecting;
        self.deadline = Some(Instant::now() + self.timeout);
        info!("[connection] hierarchy requested");
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            info!("[connection] disconnected");
        }
        self.state = ConnectionState::Disconnected;
        self.deadline = None;
    }

    /// Records traffic. Returns true on the first message after connect.
    pub fn on_message(&mut self) -> bool {
        if self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::AwaitingSnapshot;
        self.deadline = None;
        info!("[connection] connected");
        true
    }

    pub fn mark_ready(&mut self) {
        if self.state.is_connected() {
            self.state = ConnectionState::Ready;
        }
    }

    /// When the silence diagnostic is due, if still pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Logs the no-response diagnostic once the deadline has passed. State is left alone.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline && self.state == ConnectionState::Connecting => {
                warn!("[connection] no response from target after {:?}, is the bridge running?", self.timeout);
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn post(&self, message: &Message) -> Result<(), TransportError> {
        match &self.transport {
            Some(transport) => transport.post(message),
            None => Err(TransportError::Closed),
        }
    }

    /// Next inbound message. Pending forever while disconnected.
    pub async fn recv(&mut self) -> Option<Message> {
        match self.transport.as_mut() {
            Some(transport) => transport.recv().await,
            None => std::future::pending().await,
        }
    }

    pub fn try_recv(&mut self) -> Option<Message> {
        self.transport.as_mut()?.try_recv()
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }
}
