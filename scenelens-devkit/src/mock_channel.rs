/*!
Mock channel for tests without a broker or hub

Implements `Transport`: records every posted message and lets tests inject
inbound ones. Clones share state, so a test can hand one clone to the code
under test and keep the other for assertions.
*/

use scenelens_protocol::{Message, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Clone, Default)]
pub struct MockChannel {
    posted: Arc<Mutex<Vec<Message>>>,
    inbox: Arc<Mutex<VecDeque<Message>>>,
    arrived: Arc<Notify>,
    closed: Arc<AtomicBool>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message as if another endpoint had posted it.
    pub fn inject(&self, message: Message) {
        log::info!("📨 [MOCK] injected {}", message.kind());
        lock(&self.inbox).push_back(message);
        self.arrived.notify_one();
    }

    pub fn posted(&self) -> Vec<Message> {
        lock(&self.posted).clone()
    }

    pub fn posted_kinds(&self) -> Vec<&'static str> {
        lock(&self.posted).iter().map(Message::kind).collect()
    }

    pub fn find_by_kind(&self, kind: &str) -> Vec<Message> {
        lock(&self.posted).iter().filter(|m| m.kind() == kind).cloned().collect()
    }

    pub fn last_posted(&self) -> Option<Message> {
        lock(&self.posted).last().cloned()
    }

    pub fn clear_posted(&self) {
        lock(&self.posted).clear();
    }

    pub fn pending(&self) -> usize {
        lock(&self.inbox).len()
    }
}

impl Transport for MockChannel {
    fn post(&self, message: &Message) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        log::info!("📤 [MOCK] posted {}", message.kind());
        lock(&self.posted).push(message.clone());
        Ok(())
    }

    async fn recv(&mut self) -> Option<Message> {
        loop {
            if let Some(message) = self.try_recv() {
                return Some(message);
            }
            if self.closed.load(Ordering::SeqCst) {
                return None;
            }
            self.arrived.notified().await;
        }
    }

    fn try_recv(&mut self) -> Option<Message> {
        lock(&self.inbox).pop_front()
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.arrived.notify_one();
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn records_posts_across_clones() {
        let channel = MockChannel::new();
        let handle = channel.clone();
        handle.post(&Message::GetHierarchy).unwrap();
        assert_eq!(channel.posted_kinds(), vec!["get-hierarchy"]);
        channel.clear_posted();
        assert!(handle.posted().is_empty());
    }

    #[tokio::test]
    async fn recv_waits_for_injection() {
        let mut channel = MockChannel::new();
        let feeder = channel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            feeder.inject(Message::GetLayout { id: "Root".into() });
        });
        let got = tokio::time::timeout(Duration::from_secs(1), channel.recv()).await.unwrap();
        assert_eq!(got, Some(Message::GetLayout { id: "Root".into() }));
    }

    #[tokio::test]
    async fn close_ends_recv_and_rejects_posts() {
        let mut channel = MockChannel::new();
        let observer = channel.clone();
        channel.close();
        assert_eq!(channel.recv().await, None);
        assert!(!observer.is_open());
        assert!(matches!(observer.post(&Message::GetHierarchy), Err(TransportError::Closed)));
    }
}
