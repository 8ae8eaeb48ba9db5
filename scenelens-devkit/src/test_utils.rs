/*!
Test harness for inspector and bridge tests

Wraps a `MockChannel` with:
- expectations on how many messages of a kind get posted
- waiting for a kind to show up
- assertions on exact posted messages
*/

use crate::mock_channel::MockChannel;
use anyhow::{bail, Result};
use scenelens_protocol::Message;
use std::collections::BTreeMap;
use std::time::Duration;

pub struct TestHarness {
    pub channel: MockChannel,
    expectations: Vec<Expectation>,
}

#[derive(Debug)]
struct Expectation {
    kind: String,
    expected_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestStats {
    pub total_messages: usize,
    pub kind_counts: BTreeMap<&'static str, usize>,
    pub pending_inbound: usize,
}

impl TestHarness {
    pub fn new() -> Self {
        env_logger::try_init().ok();
        Self {
            channel: MockChannel::new(),
            expectations: Vec::new(),
        }
    }

    /// A transport handle sharing this harness's state.
    pub fn endpoint(&self) -> MockChannel {
        self.channel.clone()
    }

    /// Expects exactly `count` posted messages of `kind` by verification time.
    pub fn expect_messages(&mut self, kind: &str, count: usize) -> &mut Self {
        self.expectations.push(Expectation {
            kind: kind.to_string(),
            expected_count: count,
        });
        self
    }

    pub fn inject(&self, message: Message) {
        self.channel.inject(message);
    }

    /// Polls the posted log until a message of `kind` appears.
    pub async fn wait_for_kind(&self, kind: &str, timeout_ms: u64) -> Option<Message> {
        let poll = async {
            loop {
                if let Some(found) = self.channel.find_by_kind(kind).pop() {
                    return found;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        match tokio::time::timeout(Duration::from_millis(timeout_ms), poll).await {
            Ok(found) => {
                log::info!("✅ [HARNESS] got {kind}");
                Some(found)
            }
            Err(_) => {
                log::warn!("⏰ [HARNESS] timeout waiting for {kind}");
                None
            }
        }
    }

    pub fn verify_expectations(&self) -> Result<()> {
        log::info!("🔍 [HARNESS] verifying {} expectations", self.expectations.len());
        for expectation in &self.expectations {
            let actual = self.channel.find_by_kind(&expectation.kind).len();
            if actual != expectation.expected_count {
                bail!(
                    "expected {} '{}' messages, got {}",
                    expectation.expected_count,
                    expectation.kind,
                    actual
                );
            }
        }
        Ok(())
    }

    pub fn assert_message_sent(&self, expected: &Message) -> Result<()> {
        if self.channel.posted().iter().any(|m| m == expected) {
            return Ok(());
        }
        bail!("message not posted: {expected:?}");
    }

    pub fn stats(&self) -> TestStats {
        let mut kind_counts = BTreeMap::new();
        let posted = self.channel.posted();
        for message in &posted {
            *kind_counts.entry(message.kind()).or_insert(0) += 1;
        }
        TestStats {
            total_messages: posted.len(),
            kind_counts,
            pending_inbound: self.channel.pending(),
        }
    }

    pub fn reset(&mut self) {
        self.channel.clear_posted();
        self.expectations.clear();
        log::info!("🧹 [HARNESS] reset");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use scenelens_bridge::{new_state, BridgeConfig, DebugBridge};
    use scenelens_protocol::{BroadcastHub, Transport};

    #[test]
    fn expectations_count_posts() {
        let mut harness = TestHarness::new();
        let endpoint = harness.endpoint();
        endpoint.post(&Message::GetHierarchy).unwrap();
        endpoint.post(&Message::highlight(Some("Board"), false)).unwrap();
        harness.expect_messages("get-hierarchy", 1).expect_messages("highlight", 1);
        harness.verify_expectations().unwrap();
        harness.assert_message_sent(&Message::highlight(Some("Board"), false)).unwrap();
        assert!(harness.assert_message_sent(&Message::highlight(None, false)).is_err());

        harness.expect_messages("get-layout", 1);
        assert!(harness.verify_expectations().is_err());

        let stats = harness.stats();
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.kind_counts["highlight"], 1);
        harness.reset();
        assert_eq!(harness.stats().total_messages, 0);
        harness.verify_expectations().unwrap();
    }

    #[tokio::test]
    async fn wait_for_kind_times_out() {
        let harness = TestHarness::new();
        assert!(harness.wait_for_kind("get-layout", 30).await.is_none());
    }

    #[tokio::test]
    async fn demo_bridge_answers_over_hub() {
        let hub = BroadcastHub::new("harness");
        let bridge = DebugBridge::new(new_state(fixtures::demo_scene()), BridgeConfig::default()).start(hub.endpoint());
        let mut inspector_side = hub.endpoint();
        inspector_side.post(&Message::GetHierarchy).unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match inspector_side.recv().await {
                    Some(Message::Hierarchy { data }) => return Some(data),
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(reply, fixtures::snapshot());
        bridge.stop().await;
    }
}
